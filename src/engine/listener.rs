//! Listener bindings - (event name, handler) pairs attached to a component.
//!
//! A handler is an `Rc<dyn Fn>` that carries whatever context it captured.
//! When fired, it receives the tree that owns the source component so it
//! can mutate that tree synchronously.

use std::rc::Rc;

use crate::engine::{ComponentId, ComponentTree};
use crate::types::PropertyValue;

/// An event delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Component the event was fired on.
    pub source: ComponentId,
    /// Event name (e.g., "action").
    pub name: String,
    /// Optional event payload.
    pub data: Option<PropertyValue>,
}

/// Handler invoked synchronously when an event fires.
pub type EventHandler = Rc<dyn Fn(&mut ComponentTree, &Event)>;

/// Identifies a registered listener so it can be removed without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

struct Listener {
    id: ListenerId,
    event: String,
    handler: EventHandler,
}

/// Ordered list of listeners on one component.
#[derive(Default)]
pub(crate) struct ListenerList {
    listeners: Vec<Listener>,
}

impl ListenerList {
    pub fn add(&mut self, id: ListenerId, event: &str, handler: EventHandler) {
        self.listeners.push(Listener {
            id,
            event: event.to_string(),
            handler,
        });
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Snapshot of the handlers for an event, in registration order.
    ///
    /// Cloning the Rcs out lets handlers edit listener lists while the
    /// dispatch is running.
    pub fn handlers_for(&self, event: &str) -> Vec<EventHandler> {
        self.listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.handler.clone())
            .collect()
    }

    pub fn has(&self, event: &str) -> bool {
        self.listeners.iter().any(|l| l.event == event)
    }

    /// Distinct event names with at least one listener, sorted.
    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.listeners.iter().map(|l| l.event.clone()).collect();
        events.sort();
        events.dedup();
        events
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}
