//! Peer for built-in types appearing in the application tree.
//!
//! The synthetic tree mirrors the bound component one level deep: a node of
//! the same type with the same property snapshot, and one `ChildContainer`
//! per application child so each child renders through its own peer.

use std::any::Any;

use super::builders::child_container;
use crate::engine::{ComponentId, ComponentTree};
use crate::error::{Result, SyncError};
use crate::pipeline::{BasePeer, BoundComponent, Peer};

#[derive(Default)]
pub struct PrimitivePeer {
    base: BasePeer,
}

impl PrimitivePeer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Peer for PrimitivePeer {
    fn base(&self) -> &BasePeer {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BasePeer {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn create_base_component(
        &mut self,
        component: &BoundComponent<'_>,
        tree: &mut ComponentTree,
    ) -> Result<ComponentId> {
        let type_key = component
            .type_key()
            .ok_or(SyncError::UnknownComponent(component.id()))?;
        let mirror = tree.create(type_key);
        for name in component.property_names() {
            if let Some(value) = component.get_render_property(&name) {
                tree.set_property(mirror, &name, value)?;
            }
        }
        for &child in component.children() {
            let adapter = child_container(tree, child);
            tree.add(mirror, adapter)?;
        }
        Ok(mirror)
    }
}
