//! Built-in Primitives - the component vocabulary of synthetic trees.
//!
//! Peers assemble their rendering scaffold out of these types:
//! - Leaves: [`LABEL`], [`BUTTON`]
//! - Layout: [`COLUMN`], [`ROW`], [`CONTENT_PANE`], [`WINDOW_PANE`]
//! - Adapter: [`CHILD_CONTAINER`], which re-renders an application component
//!
//! The same types may appear in an application tree; [`install`] registers
//! a [`PrimitivePeer`] for each so they render like any other component.

mod builders;
mod peer;
mod types;

pub use builders::*;
pub use peer::PrimitivePeer;
pub use types::*;

use crate::error::Result;
use crate::pipeline::{AppContextBuilder, PeerDefinition};

/// Register every built-in type and its peer.
pub fn install(builder: &mut AppContextBuilder) -> Result<()> {
    for definition in definitions() {
        let type_key = definition.type_key().to_string();
        builder.register_component_type(definition)?;
        builder.register_peer(PeerDefinition::new(type_key, || Box::new(PrimitivePeer::new())))?;
    }
    Ok(())
}
