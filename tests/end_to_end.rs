//! End-to-end rendering through the public API.

use arc_peers::components::{self, ARC_TEST_COMPONENT, ARC_TEST_PANE, TestContainerPeer, TestPanePeer};
use arc_peers::primitives::{ACTION, BUTTON, LABEL, POSITION_X, POSITION_Y, TEXT, WINDOW_PANE};
use arc_peers::{
    AppContextBuilder, ChildPolicy, ComponentDefinition, ComponentTree, Extent, Peer,
    PeerDefinition, PeerState, UpdateDispatcher,
};

fn dispatcher() -> UpdateDispatcher {
    let mut builder = AppContextBuilder::new();
    components::install(&mut builder).unwrap();
    builder
        .register_component_type(ComponentDefinition::new("T").children(ChildPolicy::Any))
        .unwrap();
    builder
        .register_peer(PeerDefinition::new("T", || Box::new(TestContainerPeer::new())))
        .unwrap();
    UpdateDispatcher::new(builder.build())
}

#[test]
fn container_positions_children_and_cleans_up() {
    let mut dispatcher = dispatcher();
    let mut tree = ComponentTree::new();
    let root = tree.create("T");
    let mut children = Vec::new();
    for text in ["a", "b"] {
        let child = tree.create(ARC_TEST_COMPONENT);
        tree.set_property(child, TEXT, text).unwrap();
        tree.add(root, child).unwrap();
        children.push(child);
    }

    let body = dispatcher.elements().root();
    dispatcher.render(&tree, root, body).unwrap();

    let peer = dispatcher.peer_as::<TestContainerPeer>(root).unwrap();
    let synthetic = peer.base().tree();
    let origins: Vec<(Extent, Extent)> = peer
        .wrappers()
        .iter()
        .map(|&w| {
            let x = synthetic.get_render_property(w, POSITION_X).and_then(|v| v.as_extent());
            let y = synthetic.get_render_property(w, POSITION_Y).and_then(|v| v.as_extent());
            (x.unwrap(), y.unwrap())
        })
        .collect();
    assert_eq!(
        origins,
        vec![(Extent::px(0), Extent::px(0)), (Extent::px(120), Extent::px(0))]
    );

    // Children still belong to the application tree
    assert_eq!(tree.children(root), children.as_slice());

    let elements = dispatcher.elements();
    let windows = elements.find_by_tag(body, WINDOW_PANE);
    assert_eq!(windows.len(), 2);
    for (window, text) in windows.iter().zip(["a", "b"]) {
        let label = elements.find_by_tag(*window, LABEL)[0];
        let expected = format!("This is a freeclient label: {text}");
        assert_eq!(elements.attribute(label, TEXT), Some(expected.as_str()));
    }
    assert!(dispatcher.domain_element(root).is_some());

    dispatcher.dispose(&tree, root).unwrap();
    assert_eq!(dispatcher.domain_element(root), None);
    assert_eq!(dispatcher.peer_state(root), PeerState::Disposed);
    for child in children {
        assert_eq!(dispatcher.peer_state(child), PeerState::Disposed);
    }
    assert_eq!(dispatcher.elements().len(), 1);
}

#[test]
fn pane_nested_in_container() {
    let mut dispatcher = dispatcher();
    let mut tree = ComponentTree::new();
    let root = tree.create("T");
    let pane = tree.create(ARC_TEST_PANE);
    tree.add(root, pane).unwrap();

    let body = dispatcher.elements().root();
    dispatcher.render(&tree, root, body).unwrap();

    let buttons = dispatcher.elements().find_by_tag(body, BUTTON);
    assert_eq!(buttons.len(), 2);
    let (add, remove) = (buttons[0], buttons[1]);

    for _ in 0..3 {
        dispatcher.dispatch_input(&mut tree, add, ACTION, None).unwrap();
    }
    dispatcher.dispatch_input(&mut tree, remove, ACTION, None).unwrap();

    let peer = dispatcher.peer_as::<TestPanePeer>(pane).unwrap();
    assert_eq!(peer.added_labels(), vec!["Added Label 1", "Added Label 2"]);

    let window = dispatcher.elements().find_by_tag(body, WINDOW_PANE)[0];
    let texts: Vec<&str> = dispatcher
        .elements()
        .find_by_tag(window, LABEL)
        .into_iter()
        .filter_map(|label| dispatcher.elements().attribute(label, TEXT))
        .collect();
    assert_eq!(texts, vec!["Added Label 1", "Added Label 2"]);

    dispatcher.dispose(&tree, root).unwrap();
    assert_eq!(dispatcher.domain_element(pane), None);
    assert_eq!(dispatcher.elements().len(), 1);
}
