//! TestPane - a window with buttons that add and remove labels.
//!
//! ```text
//! ContentPane
//! └── WindowPane "A FreeClient WindowPane"
//!     └── Column
//!         ├── Row
//!         │   ├── Button "Add Label"     (action → add)
//!         │   └── Button "Remove Label"  (action → remove)
//!         └── Column                      (labels added here)
//! ```
//!
//! Both actions edit only the peer's own synthetic column, never the
//! application component's children.

use std::any::Any;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use spark_signals::{Signal, signal};
use tracing::warn;

use crate::components::layout::BackgroundStyle;
use crate::engine::{ChildPolicy, ComponentDefinition, ComponentId, ComponentTree};
use crate::error::Result;
use crate::pipeline::{
    BasePeer, BoundComponent, Peer, UpdateContext, base_render_add, base_render_dispose,
};
use crate::primitives::{self, ACTION, CELL_SPACING, INSETS, TEXT, TITLE};
use crate::renderer::ElementHandle;
use crate::types::{Extent, Insets, Rgba};

pub const ARC_TEST_PANE: &str = "ArcTestPane";

const WINDOW_TITLE: &str = "A FreeClient WindowPane";

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(ARC_TEST_PANE).children(ChildPolicy::None)
}

// =============================================================================
// Pane State
// =============================================================================

/// State shared between the peer and its button handlers.
struct PaneState {
    /// Labels added so far. Never decreases.
    added: Signal<usize>,
    /// Synthetic column receiving added labels. None unless attached.
    column: Cell<Option<ComponentId>>,
}

impl PaneState {
    fn new() -> Self {
        Self {
            added: signal(0),
            column: Cell::new(None),
        }
    }

    fn process_add(&self, tree: &mut ComponentTree) {
        let Some(column) = self.column.get() else {
            return;
        };
        let count = self.added.get() + 1;
        self.added.set(count);

        let label = primitives::label(tree, format!("Added Label {count}"));
        if let Err(err) = tree.add(column, label) {
            warn!(%err, "added label could not be attached");
            tree.destroy(label);
        }
    }

    fn process_remove(&self, tree: &mut ComponentTree) {
        let Some(column) = self.column.get() else {
            return;
        };
        let count = tree.component_count(column);
        if count == 0 {
            return;
        }
        if let Some(label) = tree.remove(column, count - 1) {
            tree.destroy(label);
        }
    }
}

/// Bind a button's action to a pane handler without keeping the pane alive.
fn bind_action(
    tree: &mut ComponentTree,
    button: ComponentId,
    state: &Rc<PaneState>,
    handler: fn(&PaneState, &mut ComponentTree),
) -> Result<()> {
    let state: Weak<PaneState> = Rc::downgrade(state);
    tree.add_listener(button, ACTION, move |tree, _| {
        if let Some(state) = state.upgrade() {
            handler(&state, tree);
        }
    })?;
    Ok(())
}

// =============================================================================
// Peer
// =============================================================================

pub struct TestPanePeer {
    base: BasePeer,
    state: Rc<PaneState>,
    background: BackgroundStyle,
    add_button: Option<ComponentId>,
    remove_button: Option<ComponentId>,
    div: Option<ElementHandle>,
}

impl Default for TestPanePeer {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPanePeer {
    pub fn new() -> Self {
        Self {
            base: BasePeer::new(),
            state: Rc::new(PaneState::new()),
            background: BackgroundStyle::default(),
            add_button: None,
            remove_button: None,
            div: None,
        }
    }

    pub fn added_label_count(&self) -> usize {
        self.state.added.get()
    }

    /// Reactive view of the added-label counter.
    pub fn added_count(&self) -> Signal<usize> {
        self.state.added.clone()
    }

    /// Synthetic column holding added labels.
    pub fn test_column(&self) -> Option<ComponentId> {
        self.state.column.get()
    }

    pub fn add_button(&self) -> Option<ComponentId> {
        self.add_button
    }

    pub fn remove_button(&self) -> Option<ComponentId> {
        self.remove_button
    }

    /// Texts of the labels currently in the column, in order.
    pub fn added_labels(&self) -> Vec<String> {
        let Some(column) = self.test_column() else {
            return Vec::new();
        };
        let tree = self.base.tree();
        tree.children(column)
            .iter()
            .filter_map(|&label| tree.get_render_property(label, TEXT))
            .map(|text| text.to_string())
            .collect()
    }
}

impl Peer for TestPanePeer {
    fn base(&self) -> &BasePeer {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BasePeer {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn initialize(&mut self) {
        self.state = Rc::new(PaneState::new());
    }

    fn create_base_component(
        &mut self,
        _component: &BoundComponent<'_>,
        tree: &mut ComponentTree,
    ) -> Result<ComponentId> {
        let content_pane = primitives::content_pane(tree);

        let window = primitives::window_pane(tree);
        tree.set_property(window, TITLE, WINDOW_TITLE)?;
        tree.add(content_pane, window)?;

        let main_column = primitives::column(tree);
        tree.set_property(main_column, CELL_SPACING, Extent::px(5))?;
        tree.set_property(main_column, INSETS, Insets::all(Extent::px(10)))?;
        tree.add(window, main_column)?;

        let controls = primitives::row(tree);
        tree.set_property(controls, CELL_SPACING, Extent::px(10))?;
        tree.add(main_column, controls)?;

        let add_button = primitives::button(tree, "Add Label", Rgba::GREEN);
        bind_action(tree, add_button, &self.state, PaneState::process_add)?;
        tree.add(controls, add_button)?;

        let remove_button = primitives::button(tree, "Remove Label", Rgba::RED);
        bind_action(tree, remove_button, &self.state, PaneState::process_remove)?;
        tree.add(controls, remove_button)?;

        let test_column = primitives::column(tree);
        tree.add(main_column, test_column)?;

        self.state.column.set(Some(test_column));
        self.add_button = Some(add_button);
        self.remove_button = Some(remove_button);
        Ok(content_pane)
    }

    fn render_add(&mut self, update: &mut UpdateContext<'_>, parent: ElementHandle) -> Result<()> {
        base_render_add(self, update, parent)?;
        self.div = Some(self.background.allocate(update, parent));
        Ok(())
    }

    fn render_dispose(&mut self, update: &mut UpdateContext<'_>) {
        base_render_dispose(self, update);
        self.state.column.set(None);
        self.add_button = None;
        self.remove_button = None;
        if let Some(div) = self.div.take() {
            update.elements_mut().remove_element(div);
        }
    }

    fn domain_element(&self) -> Option<ElementHandle> {
        self.div
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components;
    use crate::pipeline::{AppContextBuilder, PeerState, UpdateDispatcher};
    use crate::primitives::{BUTTON, LABEL};

    fn setup() -> (UpdateDispatcher, ComponentTree, ComponentId) {
        let mut builder = AppContextBuilder::new();
        components::install(&mut builder).unwrap();
        let mut dispatcher = UpdateDispatcher::new(builder.build());
        let mut tree = ComponentTree::new();
        let pane = tree.create(ARC_TEST_PANE);
        let body = dispatcher.elements().root();
        dispatcher.render(&tree, pane, body).unwrap();
        (dispatcher, tree, pane)
    }

    fn peer(dispatcher: &UpdateDispatcher, pane: ComponentId) -> &TestPanePeer {
        dispatcher.peer_as::<TestPanePeer>(pane).unwrap()
    }

    fn press(dispatcher: &mut UpdateDispatcher, tree: &mut ComponentTree, pane: ComponentId, add: bool) {
        let p = peer(dispatcher, pane);
        let button = if add { p.add_button() } else { p.remove_button() };
        let element = p.base().element_for(button.unwrap()).unwrap();
        assert_eq!(dispatcher.dispatch_input(tree, element, ACTION, None).unwrap(), 1);
    }

    #[test]
    fn test_scaffold_rendered() {
        let (dispatcher, _tree, pane) = setup();
        let elements = dispatcher.elements();
        let body = elements.root();

        let buttons = elements.find_by_tag(body, BUTTON);
        assert_eq!(buttons.len(), 2);
        assert_eq!(elements.attribute(buttons[0], TEXT), Some("Add Label"));
        assert_eq!(elements.attribute(buttons[0], "background"), Some("#00ff00"));
        assert_eq!(elements.attribute(buttons[1], TEXT), Some("Remove Label"));
        assert_eq!(elements.attribute(buttons[1], "background"), Some("#ff0000"));
        assert!(elements.find_by_attribute(body, TITLE, WINDOW_TITLE).is_some());

        let p = peer(&dispatcher, pane);
        assert_eq!(p.added_label_count(), 0);
        assert!(p.added_labels().is_empty());
        assert!(dispatcher.domain_element(pane).is_some());
    }

    #[test]
    fn test_add_once() {
        let (mut dispatcher, mut tree, pane) = setup();
        press(&mut dispatcher, &mut tree, pane, true);

        let p = peer(&dispatcher, pane);
        assert_eq!(p.added_label_count(), 1);
        assert_eq!(p.added_labels(), vec!["Added Label 1"]);

        // The new label is rendered inside the column element
        let column = p.base().element_for(p.test_column().unwrap()).unwrap();
        let labels = dispatcher.elements().find_by_tag(column, LABEL);
        assert_eq!(labels.len(), 1);
        assert_eq!(dispatcher.elements().attribute(labels[0], TEXT), Some("Added Label 1"));
    }

    #[test]
    fn test_add_three_remove_one() {
        let (mut dispatcher, mut tree, pane) = setup();
        for _ in 0..3 {
            press(&mut dispatcher, &mut tree, pane, true);
        }
        press(&mut dispatcher, &mut tree, pane, false);

        let p = peer(&dispatcher, pane);
        assert_eq!(p.added_labels(), vec!["Added Label 1", "Added Label 2"]);
        assert_eq!(p.added_label_count(), 3);

        let column = p.base().element_for(p.test_column().unwrap()).unwrap();
        let texts: Vec<&str> = dispatcher
            .elements()
            .children(column)
            .iter()
            .filter_map(|&el| dispatcher.elements().attribute(el, TEXT))
            .collect();
        assert_eq!(texts, vec!["Added Label 1", "Added Label 2"]);
    }

    #[test]
    fn test_counter_keeps_increasing_after_remove() {
        let (mut dispatcher, mut tree, pane) = setup();
        press(&mut dispatcher, &mut tree, pane, true);
        press(&mut dispatcher, &mut tree, pane, false);
        press(&mut dispatcher, &mut tree, pane, true);

        assert_eq!(peer(&dispatcher, pane).added_labels(), vec!["Added Label 2"]);
    }

    #[test]
    fn test_remove_when_empty_is_noop() {
        let (mut dispatcher, mut tree, pane) = setup();
        let before = dispatcher.elements().len();

        press(&mut dispatcher, &mut tree, pane, false);

        let p = peer(&dispatcher, pane);
        assert!(p.added_labels().is_empty());
        assert_eq!(p.added_label_count(), 0);
        assert_eq!(dispatcher.elements().len(), before);
    }

    #[test]
    fn test_handlers_never_touch_application_tree() {
        let (mut dispatcher, mut tree, pane) = setup();
        press(&mut dispatcher, &mut tree, pane, true);
        press(&mut dispatcher, &mut tree, pane, true);

        assert_eq!(tree.component_count(pane), 0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_counter_signal() {
        let (mut dispatcher, mut tree, pane) = setup();
        let counter = peer(&dispatcher, pane).added_count();
        press(&mut dispatcher, &mut tree, pane, true);
        press(&mut dispatcher, &mut tree, pane, true);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_dispose_clears_references() {
        let (mut dispatcher, mut tree, pane) = setup();
        press(&mut dispatcher, &mut tree, pane, true);
        let add = {
            let p = peer(&dispatcher, pane);
            p.base().element_for(p.add_button().unwrap()).unwrap()
        };

        dispatcher.dispose(&tree, pane).unwrap();

        let p = peer(&dispatcher, pane);
        assert_eq!(p.test_column(), None);
        assert_eq!(p.add_button(), None);
        assert_eq!(p.remove_button(), None);
        assert_eq!(p.domain_element(), None);
        assert_eq!(dispatcher.domain_element(pane), None);
        assert_eq!(dispatcher.peer_state(pane), PeerState::Disposed);
        assert_eq!(dispatcher.elements().len(), 1);

        // Input to a stale element is rejected
        assert!(dispatcher.dispatch_input(&mut tree, add, ACTION, None).is_err());
    }

    #[test]
    fn test_fresh_peer_after_rerender() {
        let (mut dispatcher, mut tree, pane) = setup();
        press(&mut dispatcher, &mut tree, pane, true);
        dispatcher.dispose(&tree, pane).unwrap();

        let body = dispatcher.elements().root();
        dispatcher.render(&tree, pane, body).unwrap();

        let p = peer(&dispatcher, pane);
        assert_eq!(p.added_label_count(), 0);
        assert!(p.added_labels().is_empty());
    }
}
