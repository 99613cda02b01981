//! Component Tree - typed nodes with properties, ordered children and listeners.
//!
//! Nodes live in a generational arena so a [`ComponentId`] that outlives its
//! node resolves to nothing instead of aliasing a later allocation.
//!
//! The same structure backs both the application-authored tree and the
//! synthetic trees peers build for themselves.

use std::collections::BTreeMap;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use super::listener::{Event, EventHandler, ListenerId, ListenerList};
use super::property::{PropValue, PropertyBinding};
use crate::error::{Result, SyncError};
use crate::types::PropertyValue;

new_key_type! {
    /// Stable identifier of a component node.
    pub struct ComponentId;
}

struct Node {
    type_key: String,
    properties: BTreeMap<String, PropertyBinding>,
    children: Vec<ComponentId>,
    parent: Option<ComponentId>,
    listeners: ListenerList,
}

/// Arena-backed component tree.
#[derive(Default)]
pub struct ComponentTree {
    nodes: SlotMap<ComponentId, Node>,
    next_listener: u64,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Create a detached node of the given type.
    pub fn create(&mut self, type_key: impl Into<String>) -> ComponentId {
        self.nodes.insert(Node {
            type_key: type_key.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            listeners: ListenerList::default(),
        })
    }

    /// Create a detached node with static properties already set.
    pub fn create_with<'p>(
        &mut self,
        type_key: impl Into<String>,
        properties: impl IntoIterator<Item = (&'p str, PropertyValue)>,
    ) -> ComponentId {
        let id = self.create(type_key);
        if let Some(node) = self.nodes.get_mut(id) {
            for (name, value) in properties {
                node.properties.insert(name.to_string(), PropValue::Static(value));
            }
        }
        id
    }

    /// Destroy a node and all of its descendants.
    ///
    /// The node is detached from its parent first. Returns false if the id
    /// was already gone.
    pub fn destroy(&mut self, id: ComponentId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        true
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn type_key(&self, id: ComponentId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.type_key.as_str())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children in order. Empty for unknown ids.
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn component_count(&self, id: ComponentId) -> usize {
        self.children(id).len()
    }

    pub fn index_of(&self, parent: ComponentId, child: ComponentId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append a child. A child that already has a parent is moved.
    pub fn add(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
        self.insert(parent, usize::MAX, child)
    }

    /// Insert a child at `index` (clamped to the child count).
    ///
    /// A child that already has a parent is removed from it first.
    pub fn insert(&mut self, parent: ComponentId, index: usize, child: ComponentId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(SyncError::UnknownComponent(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(SyncError::UnknownComponent(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SyncError::Hierarchy { parent, child });
        }

        self.detach(child);

        let Some(node) = self.nodes.get_mut(parent) else {
            return Err(SyncError::UnknownComponent(parent));
        };
        let index = index.min(node.children.len());
        node.children.insert(index, child);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove the child at `index`, returning it.
    ///
    /// The removed node stays alive and unparented; call [`destroy`](Self::destroy)
    /// to free it.
    pub fn remove(&mut self, parent: ComponentId, index: usize) -> Option<ComponentId> {
        let node = self.nodes.get_mut(parent)?;
        if index >= node.children.len() {
            return None;
        }
        let child = node.children.remove(index);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        Some(child)
    }

    /// Remove a specific child. Returns false if it was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> bool {
        match self.index_of(parent, child) {
            Some(index) => self.remove(parent, index).is_some(),
            None => false,
        }
    }

    fn detach(&mut self, id: ComponentId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// `root` and all of its descendants, pre-order.
    pub fn descendants(&self, root: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Set a static property value.
    pub fn set_property(
        &mut self,
        id: ComponentId,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        self.bind_property(id, name, PropValue::Static(value.into()))
    }

    /// Bind a property to a static value, signal or getter.
    pub fn bind_property(&mut self, id: ComponentId, name: &str, binding: PropertyBinding) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownComponent(id))?;
        node.properties.insert(name.to_string(), binding);
        Ok(())
    }

    pub fn clear_property(&mut self, id: ComponentId, name: &str) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|n| n.properties.remove(name).is_some())
    }

    /// Point-in-time snapshot of a property.
    pub fn get_render_property(&self, id: ComponentId, name: &str) -> Option<PropertyValue> {
        self.nodes.get(id)?.properties.get(name).map(|b| b.get())
    }

    /// Names of all set properties, sorted.
    pub fn property_names(&self, id: ComponentId) -> Vec<String> {
        self.nodes
            .get(id)
            .map(|n| n.properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a handler for `event` on a component.
    pub fn add_listener<F>(&mut self, id: ComponentId, event: &str, handler: F) -> Result<ListenerId>
    where
        F: Fn(&mut ComponentTree, &Event) + 'static,
    {
        let handler: EventHandler = Rc::new(handler);
        let listener = ListenerId(self.next_listener);
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownComponent(id))?;
        node.listeners.add(listener, event, handler);
        self.next_listener += 1;
        Ok(listener)
    }

    /// Remove a listener without firing it.
    pub fn remove_listener(&mut self, id: ComponentId, listener: ListenerId) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|n| n.listeners.remove(listener))
    }

    pub fn has_listeners(&self, id: ComponentId, event: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.listeners.has(event))
    }

    /// Event names with at least one listener on the component, sorted.
    pub fn listener_events(&self, id: ComponentId) -> Vec<String> {
        self.nodes
            .get(id)
            .map(|n| n.listeners.events())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, id: ComponentId) -> usize {
        self.nodes.get(id).map_or(0, |n| n.listeners.len())
    }

    /// Fire an event on a component, returning how many handlers ran.
    ///
    /// Handlers run synchronously in registration order against a snapshot
    /// of the listener list taken before the first one runs.
    pub fn fire_event(&mut self, id: ComponentId, event: &str, data: Option<PropertyValue>) -> usize {
        let handlers = match self.nodes.get(id) {
            Some(node) => node.listeners.handlers_for(event),
            None => return 0,
        };
        let event = Event {
            source: id,
            name: event.to_string(),
            data,
        };
        for handler in &handlers {
            handler(self, &event);
        }
        handlers.len()
    }
}
