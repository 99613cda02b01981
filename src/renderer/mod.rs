//! Renderer - the concrete visual tree.
//!
//! Peers translate components into [`Element`]s held by an [`ElementTree`].
//! The tree is plain data; a host embeds it into whatever surface it draws.

mod element;

pub use element::{Element, ElementHandle, ElementOwner, ElementTree};
