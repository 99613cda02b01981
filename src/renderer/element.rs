//! Element Tree - the rendered visual tree peers attach into.
//!
//! Elements are tagged nodes with string attributes and ordered children.
//! Handles are generational: once an element is removed, every handle to it
//! (or to anything beneath it) stops resolving.
//!
//! Each element records its [`ElementOwner`] so input delivered to an
//! element can be routed back to the component it was rendered for.

use std::collections::BTreeMap;

use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::engine::ComponentId;

new_key_type! {
    /// Opaque reference to a rendered element.
    pub struct ElementHandle;
}

/// Who an element was rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOwner {
    /// Allocated directly by the peer bound to this application component.
    Peer(ComponentId),
    /// Materialised for `component` in the synthetic tree of the peer bound
    /// to application component `peer`.
    Synthetic {
        peer: ComponentId,
        component: ComponentId,
    },
}

/// A rendered element.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<ElementHandle>,
    parent: Option<ElementHandle>,
    owner: Option<ElementOwner>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[ElementHandle] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementHandle> {
        self.parent
    }

    pub fn owner(&self) -> Option<ElementOwner> {
        self.owner
    }
}

/// Arena of rendered elements with a permanent root.
pub struct ElementTree {
    elements: SlotMap<ElementHandle, Element>,
    root: ElementHandle,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create a tree holding only the root element (`body`).
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element {
            tag: "body".to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            owner: None,
        });
        Self { elements, root }
    }

    pub fn root(&self) -> ElementHandle {
        self.root
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: &str, owner: Option<ElementOwner>) -> ElementHandle {
        let handle = self.elements.insert(Element {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            owner,
        });
        trace!(?handle, tag, "element created");
        handle
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle)
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.elements.contains_key(handle)
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` under `parent`, moving it if already attached.
    pub fn append_child(&mut self, parent: ElementHandle, child: ElementHandle) -> bool {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Insert `child` under `parent` at `index` (clamped).
    ///
    /// Returns false if either handle is stale or `child` is `parent` or one
    /// of its ancestors.
    pub fn insert_child(&mut self, parent: ElementHandle, index: usize, child: ElementHandle) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        let Some(parent_el) = self.elements.get_mut(parent) else {
            return false;
        };
        let index = index.min(parent_el.children.len());
        parent_el.children.insert(index, child);
        if let Some(child_el) = self.elements.get_mut(child) {
            child_el.parent = Some(parent);
        }
        true
    }

    /// Remove an element and its whole subtree. The root cannot be removed.
    pub fn remove_element(&mut self, handle: ElementHandle) -> bool {
        if handle == self.root || !self.contains(handle) {
            return false;
        }
        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.remove(current) {
                trace!(handle = ?current, tag = %element.tag, "element removed");
                stack.extend(element.children);
            }
        }
        true
    }

    fn detach(&mut self, handle: ElementHandle) {
        let parent = self.elements.get(handle).and_then(|e| e.parent);
        if let Some(parent) = parent {
            if let Some(parent_el) = self.elements.get_mut(parent) {
                parent_el.children.retain(|&c| c != handle);
            }
        }
        if let Some(element) = self.elements.get_mut(handle) {
            element.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: ElementHandle, handle: ElementHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.parent(h);
        }
        false
    }

    pub fn parent(&self, handle: ElementHandle) -> Option<ElementHandle> {
        self.elements.get(handle).and_then(|e| e.parent)
    }

    pub fn children(&self, handle: ElementHandle) -> &[ElementHandle] {
        self.elements.get(handle).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_of(&self, parent: ElementHandle, child: ElementHandle) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn set_attribute(&mut self, handle: ElementHandle, name: &str, value: impl Into<String>) -> bool {
        match self.elements.get_mut(handle) {
            Some(element) => {
                element.attributes.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Replace all attributes of an element.
    pub fn set_attributes(&mut self, handle: ElementHandle, attributes: BTreeMap<String, String>) -> bool {
        match self.elements.get_mut(handle) {
            Some(element) => {
                element.attributes = attributes;
                true
            }
            None => false,
        }
    }

    pub fn attribute(&self, handle: ElementHandle, name: &str) -> Option<&str> {
        self.elements.get(handle)?.attributes.get(name).map(String::as_str)
    }

    pub fn tag(&self, handle: ElementHandle) -> Option<&str> {
        self.elements.get(handle).map(|e| e.tag.as_str())
    }

    pub fn owner(&self, handle: ElementHandle) -> Option<ElementOwner> {
        self.elements.get(handle).and_then(|e| e.owner)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Elements under `from` (inclusive) with the given tag, document order.
    pub fn find_by_tag(&self, from: ElementHandle, tag: &str) -> Vec<ElementHandle> {
        self.descendants(from)
            .into_iter()
            .filter(|&h| self.tag(h) == Some(tag))
            .collect()
    }

    /// First element under `from` (inclusive) whose attribute equals `value`.
    pub fn find_by_attribute(&self, from: ElementHandle, name: &str, value: &str) -> Option<ElementHandle> {
        self.descendants(from)
            .into_iter()
            .find(|&h| self.attribute(h, name) == Some(value))
    }

    /// `from` and everything beneath it, pre-order.
    pub fn descendants(&self, from: ElementHandle) -> Vec<ElementHandle> {
        let mut out = Vec::new();
        if !self.contains(from) {
            return out;
        }
        let mut stack = vec![from];
        while let Some(h) = stack.pop() {
            out.push(h);
            stack.extend(self.children(h).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_exists() {
        let tree = ElementTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.tag(tree.root()), Some("body"));
    }

    #[test]
    fn test_append_and_remove_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let div = tree.create_element("div", None);
        let span = tree.create_element("span", None);

        assert!(tree.append_child(root, div));
        assert!(tree.append_child(div, span));
        assert_eq!(tree.children(root), &[div]);
        assert_eq!(tree.parent(span), Some(div));

        assert!(tree.remove_element(div));
        assert!(!tree.contains(div));
        assert!(!tree.contains(span));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);

        // Stale handles stay dead
        assert!(!tree.remove_element(div));
        assert!(!tree.set_attribute(span, "x", "y"));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = ElementTree::new();
        assert!(!tree.remove_element(tree.root()));
    }

    #[test]
    fn test_insert_moves_and_orders() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let a = tree.create_element("a", None);
        let b = tree.create_element("b", None);
        tree.append_child(root, a);
        tree.append_child(root, b);

        assert!(tree.insert_child(root, 0, b));
        assert_eq!(tree.children(root), &[b, a]);

        // Cannot insert an ancestor beneath its descendant
        assert!(!tree.insert_child(a, 0, root));
    }

    #[test]
    fn test_attributes_and_queries() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let button = tree.create_element("Button", None);
        tree.append_child(root, button);
        tree.set_attribute(button, "text", "Add Label");

        assert_eq!(tree.attribute(button, "text"), Some("Add Label"));
        assert_eq!(tree.find_by_tag(root, "Button"), vec![button]);
        assert_eq!(tree.find_by_attribute(root, "text", "Add Label"), Some(button));
        assert_eq!(tree.find_by_attribute(root, "text", "Nope"), None);

        tree.set_attributes(button, BTreeMap::new());
        assert_eq!(tree.attribute(button, "text"), None);
    }
}
