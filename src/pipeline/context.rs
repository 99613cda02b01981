//! Application context - the registries, frozen after start-up.
//!
//! Registration happens on an [`AppContextBuilder`] during initialisation.
//! [`AppContextBuilder::build`] freezes both registries into an immutable
//! [`AppContext`] shared through an `Arc`, which the dispatcher is handed
//! instead of reaching for ambient globals.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use super::peer::Peer;
use crate::engine::{ComponentDefinition, ComponentId, ComponentTree, Registry, RegistryKind};
use crate::error::{Result, SyncError};

// =============================================================================
// Peer Definition
// =============================================================================

/// Constructor for a peer instance.
pub type PeerFactory = Arc<dyn Fn() -> Box<dyn Peer> + Send + Sync>;

/// Registered rendering peer for one component type.
#[derive(Clone)]
pub struct PeerDefinition {
    type_key: String,
    factory: PeerFactory,
}

impl PeerDefinition {
    pub fn new<F>(type_key: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Peer> + Send + Sync + 'static,
    {
        Self {
            type_key: type_key.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Construct a fresh, uninitialised peer.
    pub fn instantiate(&self) -> Box<dyn Peer> {
        (self.factory)()
    }
}

impl fmt::Debug for PeerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerDefinition")
            .field("type_key", &self.type_key)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Mutable registration phase.
pub struct AppContextBuilder {
    components: Registry<ComponentDefinition>,
    peers: Registry<PeerDefinition>,
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            components: Registry::new(RegistryKind::Component),
            peers: Registry::new(RegistryKind::Peer),
        }
    }

    /// Register a component type under its own key.
    pub fn register_component_type(&mut self, definition: ComponentDefinition) -> Result<()> {
        let type_key = definition.type_key().to_string();
        self.components.register(type_key.clone(), definition)?;
        debug!(%type_key, "component type registered");
        Ok(())
    }

    /// Register the rendering peer for a type key.
    ///
    /// The component type need not be registered yet; the pairing is only
    /// checked when something is rendered.
    pub fn register_peer(&mut self, definition: PeerDefinition) -> Result<()> {
        let type_key = definition.type_key().to_string();
        self.peers.register(type_key.clone(), definition)?;
        debug!(%type_key, "peer registered");
        Ok(())
    }

    pub fn components(&self) -> &Registry<ComponentDefinition> {
        &self.components
    }

    pub fn peers(&self) -> &Registry<PeerDefinition> {
        &self.peers
    }

    /// Freeze the registries.
    pub fn build(self) -> Arc<AppContext> {
        Arc::new(AppContext {
            components: self.components,
            peers: self.peers,
        })
    }
}

// =============================================================================
// Context
// =============================================================================

/// Read-only registries shared by every dispatcher.
pub struct AppContext {
    components: Registry<ComponentDefinition>,
    peers: Registry<PeerDefinition>,
}

impl AppContext {
    pub fn components(&self) -> &Registry<ComponentDefinition> {
        &self.components
    }

    pub fn peers(&self) -> &Registry<PeerDefinition> {
        &self.peers
    }

    /// Check a subtree before rendering it.
    ///
    /// Every node must have a registered type and peer, satisfy its child
    /// policy, and hold declared properties of the declared kind.
    pub fn validate(&self, tree: &ComponentTree, root: ComponentId) -> Result<()> {
        if !tree.contains(root) {
            return Err(SyncError::UnknownComponent(root));
        }
        for id in tree.descendants(root) {
            if let Err(err) = self.validate_node(tree, id) {
                error!(component = ?id, %err, "render aborted by validation");
                return Err(err);
            }
        }
        Ok(())
    }

    fn validate_node(&self, tree: &ComponentTree, id: ComponentId) -> Result<()> {
        let type_key = tree.type_key(id).ok_or(SyncError::UnknownComponent(id))?;
        let definition = self.components.lookup(type_key)?;
        self.peers.lookup(type_key)?;

        let count = tree.component_count(id);
        if !definition.child_policy().allows(count) {
            return Err(SyncError::ChildPolicy {
                type_key: type_key.to_string(),
                count,
                policy: definition.child_policy().to_string(),
            });
        }

        for decl in definition.properties() {
            let Some(value) = tree.get_render_property(id, &decl.name) else {
                continue;
            };
            if value.kind() != decl.kind {
                return Err(SyncError::PropertyKind {
                    type_key: type_key.to_string(),
                    property: decl.name.clone(),
                    expected: decl.kind,
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChildPolicy;
    use crate::primitives::{self, PrimitivePeer};
    use crate::types::{Extent, PropertyKind};

    fn assert_send_sync<T: Send + Sync>() {}

    fn label_peer() -> PeerDefinition {
        PeerDefinition::new(primitives::LABEL, || Box::new(PrimitivePeer::new()))
    }

    fn setup() -> AppContextBuilder {
        let mut builder = AppContextBuilder::new();
        builder
            .register_component_type(
                ComponentDefinition::new(primitives::LABEL)
                    .property("text", PropertyKind::Text)
                    .children(ChildPolicy::None),
            )
            .unwrap();
        builder.register_peer(label_peer()).unwrap();
        builder
    }

    #[test]
    fn test_context_is_shareable() {
        assert_send_sync::<AppContext>();
    }

    #[test]
    fn test_duplicate_registration_is_fatal() {
        let mut builder = setup();
        assert_eq!(
            builder.register_component_type(ComponentDefinition::new(primitives::LABEL)),
            Err(SyncError::DuplicateType(primitives::LABEL.to_string()))
        );
        assert_eq!(
            builder.register_peer(label_peer()),
            Err(SyncError::DuplicatePeer(primitives::LABEL.to_string()))
        );
    }

    #[test]
    fn test_peer_registration_order_independent() {
        let mut builder = AppContextBuilder::new();
        builder.register_peer(label_peer()).unwrap();
        builder
            .register_component_type(ComponentDefinition::new(primitives::LABEL))
            .unwrap();
        let app = builder.build();

        let mut tree = ComponentTree::new();
        let label = tree.create(primitives::LABEL);
        assert_eq!(app.validate(&tree, label), Ok(()));
    }

    #[test]
    fn test_validate_missing_peer() {
        let mut builder = setup();
        builder
            .register_component_type(ComponentDefinition::new("Orphan"))
            .unwrap();
        let app = builder.build();

        let mut tree = ComponentTree::new();
        let orphan = tree.create("Orphan");
        assert_eq!(
            app.validate(&tree, orphan),
            Err(SyncError::PeerNotFound("Orphan".to_string()))
        );
    }

    #[test]
    fn test_validate_unknown_type_in_subtree() {
        let app = setup().build();
        let mut tree = ComponentTree::new();
        let label = tree.create(primitives::LABEL);
        assert_eq!(app.validate(&tree, label), Ok(()));

        let unknown = tree.create("Mystery");
        assert_eq!(
            app.validate(&tree, unknown),
            Err(SyncError::TypeNotFound("Mystery".to_string()))
        );
    }

    #[test]
    fn test_validate_child_policy_and_property_kind() {
        let app = setup().build();
        let mut tree = ComponentTree::new();
        let label = tree.create(primitives::LABEL);
        let child = tree.create(primitives::LABEL);
        tree.add(label, child).unwrap();

        assert!(matches!(
            app.validate(&tree, label),
            Err(SyncError::ChildPolicy { count: 1, .. })
        ));

        tree.remove(label, 0);
        tree.set_property(label, "text", Extent::px(3)).unwrap();
        assert_eq!(
            app.validate(&tree, label),
            Err(SyncError::PropertyKind {
                type_key: primitives::LABEL.to_string(),
                property: "text".to_string(),
                expected: PropertyKind::Text,
                actual: PropertyKind::Extent,
            })
        );
    }
}
