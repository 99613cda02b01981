//! Property bindings - static, signal, or getter.
//!
//! A component property is stored as a [`PropValue`]. Peers never see the
//! binding itself; they read a point-in-time snapshot through
//! `ComponentTree::get_render_property`, which resolves the binding at the
//! moment of the call.

use std::rc::Rc;

use spark_signals::Signal;

use crate::types::PropertyValue;

/// A property value that can be static, a signal, or a getter.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal, read on every snapshot.
    Signal(Signal<T>),
    /// Getter function, called on every snapshot.
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

/// Binding type stored on component nodes.
pub type PropertyBinding = PropValue<PropertyValue>;
