//! TestComponent - a leaf rendered as a single prefixed label.

use std::any::Any;

use crate::engine::{ChildPolicy, ComponentDefinition, ComponentId, ComponentTree};
use crate::error::Result;
use crate::pipeline::{BasePeer, BoundComponent, Peer};
use crate::primitives::{self, TEXT};
use crate::types::PropertyKind;

pub const ARC_TEST_COMPONENT: &str = "ArcTestComponent";

const LABEL_PREFIX: &str = "This is a freeclient label: ";

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(ARC_TEST_COMPONENT)
        .property(TEXT, PropertyKind::Text)
        .children(ChildPolicy::None)
}

#[derive(Default)]
pub struct TestComponentPeer {
    base: BasePeer,
}

impl TestComponentPeer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Peer for TestComponentPeer {
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
        let text = component
            .get_render_property(TEXT)
            .map(|v| v.to_string())
            .unwrap_or_default();
        Ok(primitives::label(tree, format!("{LABEL_PREFIX}{text}")))
    }

    fn output_properties(&self) -> &[&'static str] {
        &[TEXT]
    }
}
