//! Rendering peer contract.
//!
//! One peer instance is bound to one application component for as long as
//! that component is rendered. The lifecycle is fixed:
//!
//! ```text
//! Unconstructed ──initialize──▶ Initialized ──render_add──▶ Attached ──render_dispose──▶ Disposed
//! ```
//!
//! Every peer composes a [`BasePeer`] holding the synthetic component tree
//! built by [`Peer::create_base_component`]. The default `render_add`,
//! `render_update` and `render_dispose` only drive that base. A peer that
//! owns extra elements overrides them and calls [`base_render_add`] /
//! [`base_render_dispose`] first.
//!
//! # Example
//!
//! ```ignore
//! fn render_add(&mut self, update: &mut UpdateContext<'_>, parent: ElementHandle) -> Result<()> {
//!     base_render_add(self, update, parent)?;
//!     let div = update.elements_mut().create_element("div", Some(ElementOwner::Peer(update.component())));
//!     update.elements_mut().append_child(parent, div);
//!     self.div = Some(div);
//!     Ok(())
//! }
//! ```

use std::any::Any;
use std::fmt;

use super::base::BasePeer;
use super::update::{BoundComponent, UpdateContext};
use crate::engine::{ComponentId, ComponentTree};
use crate::error::{Result, SyncError};
use crate::renderer::ElementHandle;

/// Where a peer instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Unconstructed,
    Initialized,
    Attached,
    Disposed,
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeerState::Unconstructed => "unconstructed",
            PeerState::Initialized => "initialized",
            PeerState::Attached => "attached",
            PeerState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Translates one component into rendered elements and back.
pub trait Peer: Any {
    fn base(&self) -> &BasePeer;

    fn base_mut(&mut self) -> &mut BasePeer;

    fn as_any(&self) -> &dyn Any;

    /// Called once, before any rendering. Sets up peer-local state.
    fn initialize(&mut self) {}

    /// Build the synthetic subtree for the bound component into `tree`,
    /// returning its root.
    ///
    /// Must depend only on the component's current properties and children
    /// and must not allocate elements.
    fn create_base_component(
        &mut self,
        component: &BoundComponent<'_>,
        tree: &mut ComponentTree,
    ) -> Result<ComponentId>;

    /// Attach the rendered subtree under `parent`.
    fn render_add(&mut self, update: &mut UpdateContext<'_>, parent: ElementHandle) -> Result<()> {
        base_render_add(self, update, parent)
    }

    /// Incremental update while attached. Rebuilds the synthetic subtree in place.
    fn render_update(&mut self, update: &mut UpdateContext<'_>) -> Result<()> {
        base_render_update(self, update)
    }

    /// Tear down everything this peer rendered. Called exactly once.
    fn render_dispose(&mut self, update: &mut UpdateContext<'_>) {
        base_render_dispose(self, update)
    }

    /// Top-level element allocated directly by this peer, if any.
    fn domain_element(&self) -> Option<ElementHandle> {
        None
    }

    /// Properties always output for this type, set or not.
    fn output_properties(&self) -> &[&'static str] {
        &[]
    }
}

// =============================================================================
// Base behaviour
// =============================================================================

/// Build the synthetic subtree and materialise it at the end of `parent`.
pub fn base_render_add<P: Peer + ?Sized>(
    peer: &mut P,
    update: &mut UpdateContext<'_>,
    parent: ElementHandle,
) -> Result<()> {
    base_render_insert(peer, update, parent, usize::MAX)
}

/// Release the synthetic subtree and rebuild it at the same position.
pub fn base_render_update<P: Peer + ?Sized>(peer: &mut P, update: &mut UpdateContext<'_>) -> Result<()> {
    let Some(parent) = peer.base().parent_element() else {
        return Ok(());
    };
    let index = peer
        .base()
        .root_element()
        .and_then(|root| update.elements().index_of(parent, root))
        .unwrap_or(usize::MAX);
    peer.base_mut().release(update);
    base_render_insert(peer, update, parent, index)
}

/// Release the synthetic subtree and every child re-hosted inside it.
pub fn base_render_dispose<P: Peer + ?Sized>(peer: &mut P, update: &mut UpdateContext<'_>) {
    peer.base_mut().release(update);
}

fn base_render_insert<P: Peer + ?Sized>(
    peer: &mut P,
    update: &mut UpdateContext<'_>,
    parent: ElementHandle,
    index: usize,
) -> Result<()> {
    if !update.elements().contains(parent) {
        return Err(SyncError::UnknownElement(parent));
    }
    let bound = update.bound();
    let mut tree = ComponentTree::new();
    let root = peer.create_base_component(&bound, &mut tree)?;

    let base = peer.base_mut();
    base.install(tree, root, parent);
    base.materialize(update, index)
}
