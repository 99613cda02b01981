//! TestContainer - lays each child out in its own positioned window.
//!
//! ```text
//! ContentPane
//! ├── WindowPane (0, 0)     ── ChildContainer → child 0
//! ├── WindowPane (120, 0)   ── ChildContainer → child 1
//! └── ...
//! ```
//!
//! The wrappers only position children; each child is still rendered by
//! its own peer and keeps its place in the application tree.

use std::any::Any;

use crate::components::layout::{BackgroundStyle, GridLayout};
use crate::engine::{ChildPolicy, ComponentDefinition, ComponentId, ComponentTree};
use crate::error::Result;
use crate::pipeline::{
    BasePeer, BoundComponent, Peer, UpdateContext, base_render_add, base_render_dispose,
};
use crate::primitives::{self, HEIGHT, POSITION_X, POSITION_Y, WIDTH};
use crate::renderer::ElementHandle;

pub const ARC_TEST_CONTAINER: &str = "ArcTestContainer";

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(ARC_TEST_CONTAINER).children(ChildPolicy::Any)
}

pub struct TestContainerPeer {
    base: BasePeer,
    layout: GridLayout,
    background: BackgroundStyle,
    div: Option<ElementHandle>,
}

impl Default for TestContainerPeer {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContainerPeer {
    pub fn new() -> Self {
        Self::with_layout(GridLayout::default(), BackgroundStyle::default())
    }

    pub fn with_layout(layout: GridLayout, background: BackgroundStyle) -> Self {
        Self {
            base: BasePeer::new(),
            layout,
            background,
            div: None,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The positioned wrappers of the synthetic tree, in child order.
    pub fn wrappers(&self) -> Vec<ComponentId> {
        match self.base.root() {
            Some(root) => self.base.tree().children(root).to_vec(),
            None => Vec::new(),
        }
    }
}

impl Peer for TestContainerPeer {
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
        let content_pane = primitives::content_pane(tree);
        let (width, height) = self.layout.cell_size();

        for (index, &child) in component.children().iter().enumerate() {
            let (x, y) = self.layout.cell(index);
            let window = primitives::window_pane(tree);
            tree.set_property(window, POSITION_X, x)?;
            tree.set_property(window, POSITION_Y, y)?;
            tree.set_property(window, WIDTH, width)?;
            tree.set_property(window, HEIGHT, height)?;
            tree.add(content_pane, window)?;

            let adapter = primitives::child_container(tree, child);
            tree.add(window, adapter)?;
        }
        Ok(content_pane)
    }

    fn render_add(&mut self, update: &mut UpdateContext<'_>, parent: ElementHandle) -> Result<()> {
        base_render_add(self, update, parent)?;
        self.div = Some(self.background.allocate(update, parent));
        Ok(())
    }

    fn render_dispose(&mut self, update: &mut UpdateContext<'_>) {
        base_render_dispose(self, update);
        if let Some(div) = self.div.take() {
            update.elements_mut().remove_element(div);
        }
    }

    fn domain_element(&self) -> Option<ElementHandle> {
        self.div
    }
}
