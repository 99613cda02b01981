//! # arc-peers
//!
//! Component/peer synchronization for declarative UI trees.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive property bindings.
//!
//! ## Architecture
//!
//! Applications describe their UI as a [`ComponentTree`] of typed nodes.
//! Every component type has a registered rendering *peer*. A peer renders
//! its component by building a private *synthetic* tree out of built-in
//! primitives, which the pipeline then materialises into an [`ElementTree`]:
//!
//! ```text
//! ComponentTree → UpdateDispatcher → Peer (synthetic tree) → ElementTree
//! ```
//!
//! A peer that re-hosts its component's children does so through
//! `ChildContainer` adapters. The children stay owned by the application
//! tree and are rendered by their own peers inside the adapter's element.
//!
//! ## Modules
//!
//! - [`types`] - Core value types (Rgba, Extent, PropertyValue)
//! - [`engine`] - Component tree, property bindings, listeners, registries
//! - [`renderer`] - Element tree
//! - [`pipeline`] - Peer contract, application context, update dispatcher
//! - [`primitives`] - Built-in component types and their peer
//! - [`components`] - Demonstration components and peers

pub mod components;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Result, SyncError};

pub use engine::{
    ChildPolicy, ComponentDefinition, ComponentId, ComponentTree, Event, ListenerId, PropValue,
    PropertyBinding,
};

pub use renderer::{Element, ElementHandle, ElementOwner, ElementTree};

pub use pipeline::{
    AppContext, AppContextBuilder, BasePeer, BoundComponent, Peer, PeerDefinition, PeerState,
    UpdateContext, UpdateDispatcher, UpdateFlags,
};
