//! Constructors for built-in components.
//!
//! Each creates a detached node in the given tree. Attach it with
//! `ComponentTree::add`.

use super::types::*;
use crate::engine::{ComponentId, ComponentTree};
use crate::types::{PropertyValue, Rgba};

pub fn label(tree: &mut ComponentTree, text: impl Into<String>) -> ComponentId {
    tree.create_with(LABEL, [(TEXT, PropertyValue::Text(text.into()))])
}

pub fn button(tree: &mut ComponentTree, text: impl Into<String>, background: Rgba) -> ComponentId {
    tree.create_with(
        BUTTON,
        [
            (TEXT, PropertyValue::Text(text.into())),
            (BACKGROUND, PropertyValue::Color(background)),
        ],
    )
}

pub fn column(tree: &mut ComponentTree) -> ComponentId {
    tree.create(COLUMN)
}

pub fn row(tree: &mut ComponentTree) -> ComponentId {
    tree.create(ROW)
}

pub fn content_pane(tree: &mut ComponentTree) -> ComponentId {
    tree.create(CONTENT_PANE)
}

pub fn window_pane(tree: &mut ComponentTree) -> ComponentId {
    tree.create(WINDOW_PANE)
}

/// Adapter that re-renders `target`, a component of the application tree.
pub fn child_container(tree: &mut ComponentTree, target: ComponentId) -> ComponentId {
    tree.create_with(CHILD_CONTAINER, [(CHILD_COMPONENT, PropertyValue::Component(target))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let mut tree = ComponentTree::new();
        let id = label(&mut tree, "Added Label 1");
        assert_eq!(tree.type_key(id), Some(LABEL));
        assert_eq!(
            tree.get_render_property(id, TEXT),
            Some(PropertyValue::from("Added Label 1"))
        );
    }

    #[test]
    fn test_button() {
        let mut tree = ComponentTree::new();
        let id = button(&mut tree, "Add Label", Rgba::GREEN);
        assert_eq!(tree.get_render_property(id, BACKGROUND), Some(PropertyValue::Color(Rgba::GREEN)));
        assert_eq!(tree.parent(id), None);
    }

    #[test]
    fn test_child_container_references_target() {
        let mut app = ComponentTree::new();
        let target = app.create(LABEL);

        let mut synthetic = ComponentTree::new();
        let adapter = child_container(&mut synthetic, target);
        assert_eq!(
            synthetic
                .get_render_property(adapter, CHILD_COMPONENT)
                .and_then(|v| v.as_component()),
            Some(target)
        );
    }
}
