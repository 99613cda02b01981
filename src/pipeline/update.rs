//! Update context - what a peer sees during a lifecycle call.

use bitflags::bitflags;

use super::context::AppContext;
use super::dispatcher::{self, PeerTable};
use crate::engine::{ComponentId, ComponentTree};
use crate::error::Result;
use crate::renderer::{ElementHandle, ElementTree};
use crate::types::PropertyValue;

bitflags! {
    /// What changed about the component being rendered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UpdateFlags: u8 {
        const NONE = 0;
        const ADDED = 1 << 0;
        const PROPERTIES = 1 << 1;
        const CHILDREN_ADDED = 1 << 2;
        const CHILDREN_REMOVED = 1 << 3;
        const DISPOSED = 1 << 4;
    }
}

// =============================================================================
// Bound Component
// =============================================================================

/// Read-only view of the application component a peer is bound to.
#[derive(Clone, Copy)]
pub struct BoundComponent<'a> {
    id: ComponentId,
    tree: &'a ComponentTree,
}

impl<'a> BoundComponent<'a> {
    pub fn new(id: ComponentId, tree: &'a ComponentTree) -> Self {
        Self { id, tree }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn type_key(&self) -> Option<&'a str> {
        self.tree.type_key(self.id)
    }

    /// Point-in-time snapshot of a property.
    pub fn get_render_property(&self, name: &str) -> Option<PropertyValue> {
        self.tree.get_render_property(self.id, name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.tree.property_names(self.id)
    }

    pub fn children(&self) -> &'a [ComponentId] {
        self.tree.children(self.id)
    }

    pub fn tree(&self) -> &'a ComponentTree {
        self.tree
    }
}

// =============================================================================
// Update Context
// =============================================================================

/// Passed to `render_add`, `render_update` and `render_dispose`.
///
/// Gives the peer its bound component, the element tree to allocate into,
/// and a way to render or dispose application children it re-hosts.
pub struct UpdateContext<'a> {
    component: ComponentId,
    flags: UpdateFlags,
    tree: &'a ComponentTree,
    elements: &'a mut ElementTree,
    app: &'a AppContext,
    peers: &'a mut PeerTable,
    updated: Vec<String>,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(
        component: ComponentId,
        flags: UpdateFlags,
        tree: &'a ComponentTree,
        elements: &'a mut ElementTree,
        app: &'a AppContext,
        peers: &'a mut PeerTable,
    ) -> Self {
        Self {
            component,
            flags,
            tree,
            elements,
            app,
            peers,
            updated: Vec::new(),
        }
    }

    pub(crate) fn with_updated_properties(mut self, updated: Vec<String>) -> Self {
        self.updated = updated;
        self
    }

    /// The application component being rendered.
    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn flags(&self) -> UpdateFlags {
        self.flags
    }

    /// Output properties named as changed by this update. Empty unless the
    /// update came through `UpdateDispatcher::update_properties`.
    pub fn updated_properties(&self) -> &[String] {
        &self.updated
    }

    pub fn bound(&self) -> BoundComponent<'a> {
        BoundComponent::new(self.component, self.tree)
    }

    pub fn get_render_property(&self, name: &str) -> Option<PropertyValue> {
        self.tree.get_render_property(self.component, name)
    }

    pub fn app(&self) -> &'a AppContext {
        self.app
    }

    pub fn elements(&self) -> &ElementTree {
        &*self.elements
    }

    pub fn elements_mut(&mut self) -> &mut ElementTree {
        &mut *self.elements
    }

    /// Render an application component beneath `parent` through its own peer.
    pub fn render_child(&mut self, child: ComponentId, parent: ElementHandle) -> Result<()> {
        dispatcher::attach(
            self.tree,
            &mut *self.elements,
            self.app,
            &mut *self.peers,
            child,
            parent,
            Some(self.component),
        )
    }

    /// Dispose the peer of an application component this peer rendered.
    pub fn dispose_child(&mut self, child: ComponentId) -> Result<()> {
        dispatcher::detach(
            self.tree,
            &mut *self.elements,
            self.app,
            &mut *self.peers,
            child,
            Some(self.component),
        )
    }
}
