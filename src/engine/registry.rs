//! Type registries - type key to definition lookup.
//!
//! Two registries share this shape: component definitions and rendering
//! peer definitions. Both are filled once during start-up and read-only
//! afterwards; see `AppContextBuilder`.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SyncError};
use crate::types::PropertyKind;

// =============================================================================
// Registry
// =============================================================================

/// Which kind of definition a registry holds. Only affects error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Component,
    Peer,
}

/// Map from type key to definition. Registration is fatal on duplicates.
pub struct Registry<T> {
    kind: RegistryKind,
    entries: HashMap<String, T>,
}

impl<T> Registry<T> {
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Store a definition. Fails if the key is already present.
    pub fn register(&mut self, type_key: impl Into<String>, value: T) -> Result<()> {
        let type_key = type_key.into();
        if self.entries.contains_key(&type_key) {
            return Err(match self.kind {
                RegistryKind::Component => SyncError::DuplicateType(type_key),
                RegistryKind::Peer => SyncError::DuplicatePeer(type_key),
            });
        }
        self.entries.insert(type_key, value);
        Ok(())
    }

    /// Find a definition by key.
    pub fn lookup(&self, type_key: &str) -> Result<&T> {
        self.entries.get(type_key).ok_or_else(|| match self.kind {
            RegistryKind::Component => SyncError::TypeNotFound(type_key.to_string()),
            RegistryKind::Peer => SyncError::PeerNotFound(type_key.to_string()),
        })
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.entries.contains_key(type_key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Component Definition
// =============================================================================

/// How many children a component type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPolicy {
    /// Leaf component.
    None,
    /// Any number of children.
    Any,
    /// Up to `n` children.
    AtMost(usize),
    /// Exactly `n` children.
    Exactly(usize),
}

impl ChildPolicy {
    pub fn allows(&self, count: usize) -> bool {
        match *self {
            ChildPolicy::None => count == 0,
            ChildPolicy::Any => true,
            ChildPolicy::AtMost(n) => count <= n,
            ChildPolicy::Exactly(n) => count == n,
        }
    }
}

impl fmt::Display for ChildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildPolicy::None => f.write_str("no children"),
            ChildPolicy::Any => f.write_str("any number of children"),
            ChildPolicy::AtMost(n) => write!(f, "at most {n} children"),
            ChildPolicy::Exactly(n) => write!(f, "exactly {n} children"),
        }
    }
}

/// A named, typed property declared by a component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub kind: PropertyKind,
}

/// Describes a component type: its key, declared properties and child policy.
///
/// # Example
///
/// ```ignore
/// let def = ComponentDefinition::new("Label")
///     .property("text", PropertyKind::Text)
///     .children(ChildPolicy::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    type_key: String,
    properties: Vec<PropertyDecl>,
    children: ChildPolicy,
}

impl ComponentDefinition {
    /// New definition accepting any children and declaring no properties.
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            properties: Vec::new(),
            children: ChildPolicy::Any,
        }
    }

    pub fn property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn children(mut self, policy: ChildPolicy) -> Self {
        self.children = policy;
        self
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }

    pub fn child_policy(&self) -> ChildPolicy {
        self.children
    }

    /// Declared kind of a property, if declared.
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.properties.iter().find(|p| p.name == name).map(|p| p.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_lookup() {
        let mut registry = Registry::new(RegistryKind::Component);
        let def = ComponentDefinition::new("Label").property("text", PropertyKind::Text);

        registry.register("Label", def.clone()).unwrap();
        assert_eq!(registry.lookup("Label"), Ok(&def));
        assert!(registry.contains("Label"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut components = Registry::new(RegistryKind::Component);
        components.register("Label", 1).unwrap();
        assert_eq!(
            components.register("Label", 2),
            Err(SyncError::DuplicateType("Label".to_string()))
        );
        // First registration survives
        assert_eq!(components.lookup("Label"), Ok(&1));

        let mut peers = Registry::new(RegistryKind::Peer);
        peers.register("Label", ()).unwrap();
        assert_eq!(
            peers.register("Label", ()),
            Err(SyncError::DuplicatePeer("Label".to_string()))
        );
    }

    #[test]
    fn test_missing_lookup() {
        let components: Registry<()> = Registry::new(RegistryKind::Component);
        assert_eq!(components.lookup("Nope"), Err(SyncError::TypeNotFound("Nope".to_string())));

        let peers: Registry<()> = Registry::new(RegistryKind::Peer);
        assert_eq!(peers.lookup("Nope"), Err(SyncError::PeerNotFound("Nope".to_string())));
    }

    #[test]
    fn test_keys_sorted() {
        let mut registry = Registry::new(RegistryKind::Component);
        registry.register("Row", ()).unwrap();
        registry.register("Column", ()).unwrap();
        registry.register("Label", ()).unwrap();
        assert_eq!(registry.keys(), vec!["Column", "Label", "Row"]);
    }

    #[test]
    fn test_child_policy() {
        assert!(ChildPolicy::None.allows(0));
        assert!(!ChildPolicy::None.allows(1));
        assert!(ChildPolicy::Any.allows(1000));
        assert!(ChildPolicy::AtMost(1).allows(1));
        assert!(!ChildPolicy::AtMost(1).allows(2));
        assert!(ChildPolicy::Exactly(1).allows(1));
        assert!(!ChildPolicy::Exactly(1).allows(0));
    }
}
