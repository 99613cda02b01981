//! Built-in component types - keys, property names and definitions.

use crate::engine::{ChildPolicy, ComponentDefinition};
use crate::types::PropertyKind;

// =============================================================================
// Type Keys
// =============================================================================

pub const LABEL: &str = "Label";
pub const BUTTON: &str = "Button";
pub const COLUMN: &str = "Column";
pub const ROW: &str = "Row";
pub const CONTENT_PANE: &str = "ContentPane";
pub const WINDOW_PANE: &str = "WindowPane";
/// Pass-through adapter re-rendering an application component.
pub const CHILD_CONTAINER: &str = "ChildContainer";

// =============================================================================
// Property Names
// =============================================================================

pub const TEXT: &str = "text";
pub const TITLE: &str = "title";
pub const BACKGROUND: &str = "background";
pub const CELL_SPACING: &str = "cellSpacing";
pub const INSETS: &str = "insets";
pub const POSITION_X: &str = "positionX";
pub const POSITION_Y: &str = "positionY";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
/// Application component re-hosted by a `ChildContainer`.
pub const CHILD_COMPONENT: &str = "component";

// =============================================================================
// Events
// =============================================================================

/// Fired when a button is activated.
pub const ACTION: &str = "action";

// =============================================================================
// Definitions
// =============================================================================

/// Definitions of every built-in type.
pub fn definitions() -> Vec<ComponentDefinition> {
    vec![
        ComponentDefinition::new(LABEL)
            .property(TEXT, PropertyKind::Text)
            .children(ChildPolicy::None),
        ComponentDefinition::new(BUTTON)
            .property(TEXT, PropertyKind::Text)
            .property(BACKGROUND, PropertyKind::Color)
            .children(ChildPolicy::None),
        ComponentDefinition::new(COLUMN)
            .property(CELL_SPACING, PropertyKind::Extent)
            .property(INSETS, PropertyKind::Insets)
            .children(ChildPolicy::Any),
        ComponentDefinition::new(ROW)
            .property(CELL_SPACING, PropertyKind::Extent)
            .property(INSETS, PropertyKind::Insets)
            .children(ChildPolicy::Any),
        ComponentDefinition::new(CONTENT_PANE)
            .property(BACKGROUND, PropertyKind::Color)
            .children(ChildPolicy::Any),
        ComponentDefinition::new(WINDOW_PANE)
            .property(TITLE, PropertyKind::Text)
            .property(POSITION_X, PropertyKind::Extent)
            .property(POSITION_Y, PropertyKind::Extent)
            .property(WIDTH, PropertyKind::Extent)
            .property(HEIGHT, PropertyKind::Extent)
            .children(ChildPolicy::AtMost(1)),
        ComponentDefinition::new(CHILD_CONTAINER)
            .property(CHILD_COMPONENT, PropertyKind::Component)
            .children(ChildPolicy::None),
    ]
}
