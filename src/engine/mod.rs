//! Engine - component tree, property bindings, listeners and registries.
//!
//! - Tree: generational arena of typed nodes with ordered children
//! - Property: static / signal / getter bindings resolved on read
//! - Listener: (event, handler) pairs fired synchronously
//! - Registry: type key to definition maps, filled once at start-up
//!
//! # Ownership
//!
//! ```text
//! root (ArcTestContainer)
//! ├── child 0 (ArcTestComponent)   parent = root
//! └── child 1 (ArcTestComponent)   parent = root
//! ```
//!
//! A node has at most one parent. Adding it elsewhere moves it.

mod listener;
mod property;
mod registry;
mod tree;

pub use listener::{Event, EventHandler, ListenerId};
pub use property::{PropValue, PropertyBinding};
pub use registry::{ChildPolicy, ComponentDefinition, PropertyDecl, Registry, RegistryKind};
pub use tree::{ComponentId, ComponentTree};
