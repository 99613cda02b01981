//! Error types for registration, validation and peer lifecycle.

use thiserror::Error;

use crate::engine::ComponentId;
use crate::pipeline::PeerState;
use crate::renderer::ElementHandle;
use crate::types::PropertyKind;

/// Everything that can go wrong while registering types or driving peers.
///
/// Configuration errors (duplicates, missing definitions, policy violations)
/// abort the render that surfaced them. Lifecycle errors are programmer
/// errors reported instead of corrupting peer state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// A component type key was registered twice.
    #[error("component type already registered: {0}")]
    DuplicateType(String),

    /// A peer was registered twice for the same type key.
    #[error("peer already registered for type: {0}")]
    DuplicatePeer(String),

    /// No component definition is registered for the key.
    #[error("component type not found: {0}")]
    TypeNotFound(String),

    /// No rendering peer is registered for the key.
    #[error("no peer registered for type: {0}")]
    PeerNotFound(String),

    /// A component has more or fewer children than its definition allows.
    #[error("type {type_key} does not accept {count} children ({policy})")]
    ChildPolicy {
        type_key: String,
        count: usize,
        policy: String,
    },

    /// A property holds a value of a different kind than declared.
    #[error("property {property} of type {type_key} must be {expected}, got {actual}")]
    PropertyKind {
        type_key: String,
        property: String,
        expected: PropertyKind,
        actual: PropertyKind,
    },

    /// A tree edit would create a cycle.
    #[error("cannot add {child:?} beneath {parent:?}: would create a cycle")]
    Hierarchy {
        parent: ComponentId,
        child: ComponentId,
    },

    /// The id does not refer to a live component.
    #[error("unknown component: {0:?}")]
    UnknownComponent(ComponentId),

    /// The handle does not refer to a live element.
    #[error("unknown element: {0:?}")]
    UnknownElement(ElementHandle),

    /// A lifecycle call arrived in a state that does not permit it.
    #[error("cannot {operation} component {component:?} while {state}")]
    Lifecycle {
        component: ComponentId,
        state: PeerState,
        operation: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
