//! Core value types for arc-peers.
//!
//! These are the values that flow from component properties into rendered
//! element attributes. Every property a peer reads through
//! `get_render_property` resolves to a [`PropertyValue`].

use std::fmt;

use crate::engine::ComponentId;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Integers keep comparisons exact. Alpha 255 = fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    // Standard colors
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);

    /// Parse a `#rrggbb` or `#rrggbbaa` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

// =============================================================================
// Extent
// =============================================================================

/// A length in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Extent(pub i32);

impl Extent {
    pub const fn px(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

// =============================================================================
// Insets
// =============================================================================

/// Spacing on each side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub top: Extent,
    pub right: Extent,
    pub bottom: Extent,
    pub left: Extent,
}

impl Insets {
    /// Same extent on all four sides.
    pub const fn all(extent: Extent) -> Self {
        Self {
            top: extent,
            right: extent,
            bottom: extent,
            left: extent,
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }
}

impl fmt::Display for Insets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uniform() {
            write!(f, "{}", self.top)
        } else {
            write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
        }
    }
}

// =============================================================================
// Property Values
// =============================================================================

/// Declared kind of a component property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Text,
    Integer,
    Boolean,
    Extent,
    Insets,
    Color,
    Component,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Text => "text",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Extent => "extent",
            PropertyKind::Insets => "insets",
            PropertyKind::Color => "color",
            PropertyKind::Component => "component",
        };
        f.write_str(name)
    }
}

/// A resolved property value.
///
/// `Component` references a node of the *application* tree. It is how a
/// pass-through adapter in a synthetic tree points back at the child it
/// re-renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Extent(Extent),
    Insets(Insets),
    Color(Rgba),
    Component(ComponentId),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Extent(_) => PropertyKind::Extent,
            PropertyValue::Insets(_) => PropertyKind::Insets,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::Component(_) => PropertyKind::Component,
        }
    }

    pub fn as_extent(&self) -> Option<Extent> {
        match self {
            PropertyValue::Extent(e) => Some(*e),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<ComponentId> {
        match self {
            PropertyValue::Component(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Integer(n) => write!(f, "{n}"),
            PropertyValue::Boolean(b) => write!(f, "{b}"),
            PropertyValue::Extent(e) => write!(f, "{e}"),
            PropertyValue::Insets(i) => write!(f, "{i}"),
            PropertyValue::Color(c) => write!(f, "{c}"),
            PropertyValue::Component(id) => write!(f, "{id:?}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<Extent> for PropertyValue {
    fn from(value: Extent) -> Self {
        PropertyValue::Extent(value)
    }
}

impl From<Insets> for PropertyValue {
    fn from(value: Insets) -> Self {
        PropertyValue::Insets(value)
    }
}

impl From<Rgba> for PropertyValue {
    fn from(value: Rgba) -> Self {
        PropertyValue::Color(value)
    }
}

impl From<ComponentId> for PropertyValue {
    fn from(value: ComponentId) -> Self {
        PropertyValue::Component(value)
    }
}
