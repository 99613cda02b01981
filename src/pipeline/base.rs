//! Base peer - materialises a synthetic component tree into elements.
//!
//! Each synthetic node becomes one element tagged with the node's type key,
//! its properties rendered as attributes. A `ChildContainer` node is a
//! pass-through adapter: the application component it references is
//! rendered inside its element by that component's own peer.
//!
//! After a listener edits the synthetic tree, [`BasePeer::synchronize`]
//! brings the elements back in line without rebuilding untouched nodes.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{trace, warn};

use super::update::UpdateContext;
use crate::engine::{ComponentId, ComponentTree};
use crate::error::{Result, SyncError};
use crate::primitives;
use crate::renderer::{ElementHandle, ElementOwner};
use crate::types::PropertyValue;

/// Synthetic tree plus the elements rendered for it.
#[derive(Default)]
pub struct BasePeer {
    tree: ComponentTree,
    root: Option<ComponentId>,
    parent: Option<ElementHandle>,
    rendered: HashMap<ComponentId, ElementHandle>,
    /// (adapter in the synthetic tree, application child it re-hosts)
    adopted: Vec<(ComponentId, ComponentId)>,
}

impl BasePeer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The synthetic tree. Empty unless attached.
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// Element the synthetic root was attached under.
    pub fn parent_element(&self) -> Option<ElementHandle> {
        self.parent
    }

    pub fn root_element(&self) -> Option<ElementHandle> {
        self.root.and_then(|root| self.element_for(root))
    }

    /// Element rendered for a synthetic node.
    pub fn element_for(&self, id: ComponentId) -> Option<ElementHandle> {
        self.rendered.get(&id).copied()
    }

    /// Application components currently re-hosted through adapters.
    pub fn adopted(&self) -> Vec<ComponentId> {
        self.adopted.iter().map(|&(_, target)| target).collect()
    }

    pub fn is_materialized(&self) -> bool {
        self.root.is_some()
    }

    /// Fire an event on a synthetic node. Returns the number of handlers run.
    pub fn fire(&mut self, id: ComponentId, event: &str, data: Option<PropertyValue>) -> usize {
        self.tree.fire_event(id, event, data)
    }

    pub(crate) fn install(&mut self, tree: ComponentTree, root: ComponentId, parent: ElementHandle) {
        self.tree = tree;
        self.root = Some(root);
        self.parent = Some(parent);
    }

    /// Render the whole synthetic tree and insert it under the parent.
    pub(crate) fn materialize(&mut self, update: &mut UpdateContext<'_>, index: usize) -> Result<()> {
        let (Some(root), Some(parent)) = (self.root, self.parent) else {
            return Ok(());
        };
        let element = self.build(update, root)?;
        update.elements_mut().insert_child(parent, index, element);
        trace!(component = ?update.component(), nodes = self.rendered.len(), "synthetic tree materialized");
        Ok(())
    }

    fn build(&mut self, update: &mut UpdateContext<'_>, id: ComponentId) -> Result<ElementHandle> {
        let type_key = self
            .tree
            .type_key(id)
            .ok_or(SyncError::UnknownComponent(id))?
            .to_string();
        let owner = ElementOwner::Synthetic {
            peer: update.component(),
            component: id,
        };
        let element = update.elements_mut().create_element(&type_key, Some(owner));
        update.elements_mut().set_attributes(element, self.attributes(id));
        self.rendered.insert(id, element);

        let children = self.tree.children(id).to_vec();
        for child in children {
            let child_element = self.build(update, child)?;
            update.elements_mut().append_child(element, child_element);
        }

        if type_key == primitives::CHILD_CONTAINER {
            let target = self
                .tree
                .get_render_property(id, primitives::CHILD_COMPONENT)
                .and_then(|v| v.as_component());
            if let Some(target) = target {
                update.render_child(target, element)?;
                self.adopted.push((id, target));
            }
        }
        Ok(element)
    }

    fn attributes(&self, id: ComponentId) -> BTreeMap<String, String> {
        self.tree
            .property_names(id)
            .into_iter()
            .filter_map(|name| {
                let value = self.tree.get_render_property(id, &name)?;
                match value {
                    PropertyValue::Component(_) => None,
                    value => Some((name, value.to_string())),
                }
            })
            .collect()
    }

    /// Bring elements back in line with the synthetic tree.
    ///
    /// Removed nodes lose their elements, new nodes get elements, surviving
    /// nodes get fresh attributes and their children are put back in order.
    pub(crate) fn synchronize(&mut self, update: &mut UpdateContext<'_>) -> Result<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let live: HashSet<ComponentId> = self.tree.descendants(root).into_iter().collect();

        let (gone, kept): (Vec<_>, Vec<_>) = self
            .adopted
            .drain(..)
            .partition(|(adapter, _)| !live.contains(adapter));
        self.adopted = kept;
        for (_, target) in gone {
            if let Err(err) = update.dispose_child(target) {
                warn!(component = ?target, %err, "re-hosted child could not be disposed");
            }
        }

        let stale: Vec<ComponentId> = self
            .rendered
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(element) = self.rendered.remove(&id) {
                update.elements_mut().remove_element(element);
            }
        }

        if !self.tree.contains(root) {
            self.root = None;
            return Ok(());
        }
        self.sync_node(update, root)?;
        Ok(())
    }

    fn sync_node(&mut self, update: &mut UpdateContext<'_>, id: ComponentId) -> Result<ElementHandle> {
        let existing = self
            .rendered
            .get(&id)
            .copied()
            .filter(|&element| update.elements().contains(element));
        let Some(element) = existing else {
            return self.build(update, id);
        };

        update.elements_mut().set_attributes(element, self.attributes(id));
        let children = self.tree.children(id).to_vec();
        for (index, child) in children.into_iter().enumerate() {
            let child_element = self.sync_node(update, child)?;
            update.elements_mut().insert_child(element, index, child_element);
        }
        Ok(element)
    }

    /// Dispose re-hosted children, remove every element, forget the tree.
    pub(crate) fn release(&mut self, update: &mut UpdateContext<'_>) {
        for (_, target) in std::mem::take(&mut self.adopted) {
            if let Err(err) = update.dispose_child(target) {
                warn!(component = ?target, %err, "re-hosted child could not be disposed");
            }
        }
        for (_, element) in self.rendered.drain() {
            update.elements_mut().remove_element(element);
        }
        self.tree = ComponentTree::new();
        self.root = None;
        self.parent = None;
    }
}
