//! Synchronization Pipeline
//!
//! Connects the component tree to the element tree through rendering peers.
//!
//! # Data Flow
//!
//! ```text
//! app mutates ComponentTree → UpdateDispatcher → Peer::render_* → ElementTree
//!          ▲                                                          │
//!          └──────────── listeners fired by dispatch_input ◀──────────┘
//! ```
//!
//! - **context** - registries frozen into a shared [`AppContext`]
//! - **peer** - the [`Peer`] contract and its base behaviour
//! - **base** - [`BasePeer`], the synthetic tree materialiser
//! - **update** - [`UpdateContext`] handed to every lifecycle call
//! - **dispatcher** - [`UpdateDispatcher`], the lifecycle driver

mod base;
mod context;
mod dispatcher;
mod peer;
mod update;

pub use base::BasePeer;
pub use context::{AppContext, AppContextBuilder, PeerDefinition, PeerFactory};
pub use dispatcher::UpdateDispatcher;
pub use peer::{Peer, PeerState, base_render_add, base_render_dispose, base_render_update};
pub use update::{BoundComponent, UpdateContext, UpdateFlags};
