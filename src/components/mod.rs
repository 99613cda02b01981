//! Demonstration components and their peers.
//!
//! - [`ARC_TEST_COMPONENT`]: leaf rendered as one prefixed label
//! - [`ARC_TEST_CONTAINER`]: wraps each child in a positioned window
//! - [`ARC_TEST_PANE`]: window whose buttons add and remove labels
//!
//! Each peer builds a synthetic tree of built-in primitives, so
//! [`install`] registers the primitives as well.

pub mod layout;
mod test_component;
mod test_container;
mod test_pane;

pub use layout::{BackgroundStyle, GridLayout};
pub use test_component::{ARC_TEST_COMPONENT, TestComponentPeer};
pub use test_container::{ARC_TEST_CONTAINER, TestContainerPeer};
pub use test_pane::{ARC_TEST_PANE, TestPanePeer};

use crate::error::Result;
use crate::pipeline::{AppContextBuilder, PeerDefinition};
use crate::primitives;

/// Register the built-in primitives and every demonstration component.
pub fn install(builder: &mut AppContextBuilder) -> Result<()> {
    primitives::install(builder)?;
    register_test_component(builder)?;
    register_test_container(builder)?;
    register_test_pane(builder)
}

pub fn register_test_component(builder: &mut AppContextBuilder) -> Result<()> {
    builder.register_component_type(test_component::definition())?;
    builder.register_peer(PeerDefinition::new(ARC_TEST_COMPONENT, || {
        Box::new(TestComponentPeer::new())
    }))
}

pub fn register_test_container(builder: &mut AppContextBuilder) -> Result<()> {
    builder.register_component_type(test_container::definition())?;
    builder.register_peer(PeerDefinition::new(ARC_TEST_CONTAINER, || {
        Box::new(TestContainerPeer::new())
    }))
}

pub fn register_test_pane(builder: &mut AppContextBuilder) -> Result<()> {
    builder.register_component_type(test_pane::definition())?;
    builder.register_peer(PeerDefinition::new(ARC_TEST_PANE, || Box::new(TestPanePeer::new())))
}
