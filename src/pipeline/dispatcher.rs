//! Update dispatcher - drives peer lifecycles against an element tree.
//!
//! The dispatcher owns the element tree and one peer slot per rendered
//! application component. It enforces the lifecycle state machine:
//! rendering an attached component, or disposing one that is not attached,
//! is reported as [`SyncError::Lifecycle`] and leaves everything untouched.
//!
//! A peer is taken out of its slot for the duration of its own lifecycle
//! call, so peers can render and dispose the children they re-host through
//! the same table. A re-hosted child records its host and can only be
//! disposed through it.
//!
//! A lifecycle call that fails part way is rolled back through
//! `render_dispose` and leaves the peer Disposed, so no element or child
//! peer outlives a half-built render.
//!
//! # Example
//!
//! ```ignore
//! let mut builder = AppContextBuilder::new();
//! components::install(&mut builder)?;
//! let mut dispatcher = UpdateDispatcher::new(builder.build());
//!
//! let body = dispatcher.elements().root();
//! dispatcher.render(&tree, root, body)?;
//! // ... input, updates ...
//! dispatcher.dispose(&tree, root)?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::context::AppContext;
use super::peer::{Peer, PeerState};
use super::update::{UpdateContext, UpdateFlags};
use crate::engine::{ComponentId, ComponentTree};
use crate::error::{Result, SyncError};
use crate::renderer::{ElementHandle, ElementOwner, ElementTree};
use crate::types::PropertyValue;

// =============================================================================
// Peer Table
// =============================================================================

pub(crate) struct PeerSlot {
    type_key: String,
    state: PeerState,
    /// Peer that rendered this component through an adapter, if any.
    host: Option<ComponentId>,
    /// None while the peer is executing one of its own lifecycle calls.
    peer: Option<Box<dyn Peer>>,
}

pub(crate) type PeerTable = HashMap<ComponentId, PeerSlot>;

fn state_of(peers: &PeerTable, id: ComponentId) -> PeerState {
    peers.get(&id).map_or(PeerState::Unconstructed, |slot| slot.state)
}

fn violation(component: ComponentId, state: PeerState, operation: &'static str) -> SyncError {
    warn!(?component, %state, operation, "lifecycle violation");
    SyncError::Lifecycle {
        component,
        state,
        operation,
    }
}

/// Construct, initialize and attach the peer for `id` under `parent`.
///
/// A component whose previous peer was disposed gets a fresh instance.
/// `host` is the peer re-hosting `id`, or None for a top-level render.
pub(crate) fn attach(
    tree: &ComponentTree,
    elements: &mut ElementTree,
    app: &AppContext,
    peers: &mut PeerTable,
    id: ComponentId,
    parent: ElementHandle,
    host: Option<ComponentId>,
) -> Result<()> {
    let state = state_of(peers, id);
    if matches!(state, PeerState::Initialized | PeerState::Attached) {
        return Err(violation(id, state, "render"));
    }

    let type_key = tree
        .type_key(id)
        .ok_or(SyncError::UnknownComponent(id))?
        .to_string();
    let mut peer = app.peers().lookup(&type_key)?.instantiate();
    peer.initialize();
    debug!(%type_key, component = ?id, "peer initialized");

    peers.insert(
        id,
        PeerSlot {
            type_key: type_key.clone(),
            state: PeerState::Initialized,
            host,
            peer: None,
        },
    );

    let result = {
        let mut update = UpdateContext::new(id, UpdateFlags::ADDED, tree, elements, app, peers);
        let result = peer.render_add(&mut update, parent);
        if result.is_err() {
            // Roll back whatever was materialised before the failure.
            peer.render_dispose(&mut update);
        }
        result
    };

    if let Some(slot) = peers.get_mut(&id) {
        slot.state = if result.is_ok() {
            PeerState::Attached
        } else {
            PeerState::Disposed
        };
        slot.peer = Some(peer);
    }
    match &result {
        Ok(()) => debug!(%type_key, component = ?id, "peer attached"),
        Err(err) => warn!(%type_key, component = ?id, %err, "render_add failed"),
    }
    result
}

/// Dispose the attached peer for `id`.
///
/// `host` must match the peer that rendered `id`: a re-hosted child is
/// only disposed by its host, a top-level component only with None.
pub(crate) fn detach(
    tree: &ComponentTree,
    elements: &mut ElementTree,
    app: &AppContext,
    peers: &mut PeerTable,
    id: ComponentId,
    host: Option<ComponentId>,
) -> Result<()> {
    let owner = peers.get(&id).and_then(|slot| slot.host);
    if state_of(peers, id) == PeerState::Attached && owner != host {
        warn!(component = ?id, ?owner, ?host, "dispose by a peer that does not host the component");
        return Err(violation(id, PeerState::Attached, "dispose re-hosted"));
    }
    let (mut peer, type_key) = take_attached(peers, id, "dispose")?;
    {
        let mut update = UpdateContext::new(id, UpdateFlags::DISPOSED, tree, elements, app, peers);
        peer.render_dispose(&mut update);
    }
    if let Some(slot) = peers.get_mut(&id) {
        slot.state = PeerState::Disposed;
        slot.peer = Some(peer);
    }
    debug!(%type_key, component = ?id, "peer disposed");
    Ok(())
}

fn take_attached(
    peers: &mut PeerTable,
    id: ComponentId,
    operation: &'static str,
) -> Result<(Box<dyn Peer>, String)> {
    let state = state_of(peers, id);
    if state != PeerState::Attached {
        return Err(violation(id, state, operation));
    }
    let slot = peers.get_mut(&id).ok_or_else(|| violation(id, state, operation))?;
    let peer = slot.peer.take().ok_or_else(|| violation(id, state, operation))?;
    Ok((peer, slot.type_key.clone()))
}

fn restore(peers: &mut PeerTable, id: ComponentId, peer: Box<dyn Peer>) {
    if let Some(slot) = peers.get_mut(&id) {
        slot.peer = Some(peer);
    }
}

/// Tear down a peer whose update failed and mark it Disposed.
fn roll_back(
    tree: &ComponentTree,
    elements: &mut ElementTree,
    app: &AppContext,
    peers: &mut PeerTable,
    id: ComponentId,
    mut peer: Box<dyn Peer>,
) {
    {
        let mut update = UpdateContext::new(id, UpdateFlags::DISPOSED, tree, elements, app, peers);
        peer.render_dispose(&mut update);
    }
    if let Some(slot) = peers.get_mut(&id) {
        slot.state = PeerState::Disposed;
        slot.peer = Some(peer);
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// In-process driver for peer lifecycles.
pub struct UpdateDispatcher {
    app: Arc<AppContext>,
    elements: ElementTree,
    peers: PeerTable,
}

impl UpdateDispatcher {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self {
            app,
            elements: ElementTree::new(),
            peers: HashMap::new(),
        }
    }

    pub fn app(&self) -> &Arc<AppContext> {
        &self.app
    }

    pub fn elements(&self) -> &ElementTree {
        &self.elements
    }

    /// Validate the subtree at `root`, then render it under `parent`.
    ///
    /// Configuration errors abort before any element is allocated.
    pub fn render(&mut self, tree: &ComponentTree, root: ComponentId, parent: ElementHandle) -> Result<()> {
        if !self.elements.contains(parent) {
            return Err(SyncError::UnknownElement(parent));
        }
        let state = state_of(&self.peers, root);
        if matches!(state, PeerState::Initialized | PeerState::Attached) {
            return Err(violation(root, state, "render"));
        }
        self.app.validate(tree, root)?;
        attach(tree, &mut self.elements, &self.app, &mut self.peers, root, parent, None)
    }

    /// Notify an attached peer that its component changed.
    ///
    /// The subtree is validated first. If the peer fails to re-render it is
    /// rolled back and left Disposed.
    pub fn update(&mut self, tree: &ComponentTree, id: ComponentId, flags: UpdateFlags) -> Result<()> {
        self.update_with(tree, id, flags, Vec::new())
    }

    /// Notify an attached peer that the named properties changed.
    ///
    /// The peer sees only the names it outputs, through
    /// [`UpdateContext::updated_properties`].
    pub fn update_properties(&mut self, tree: &ComponentTree, id: ComponentId, names: &[&str]) -> Result<()> {
        let updated = self.updated_output_property_names(tree, id, names)?;
        self.update_with(tree, id, UpdateFlags::PROPERTIES, updated)
    }

    fn update_with(
        &mut self,
        tree: &ComponentTree,
        id: ComponentId,
        flags: UpdateFlags,
        updated: Vec<String>,
    ) -> Result<()> {
        self.app.validate(tree, id)?;
        let (mut peer, type_key) = take_attached(&mut self.peers, id, "update")?;
        let result = {
            let mut update =
                UpdateContext::new(id, flags, tree, &mut self.elements, &self.app, &mut self.peers)
                    .with_updated_properties(updated);
            peer.render_update(&mut update)
        };
        match &result {
            Ok(()) => {
                restore(&mut self.peers, id, peer);
                debug!(%type_key, component = ?id, ?flags, "peer updated");
            }
            Err(err) => {
                warn!(%type_key, component = ?id, %err, "render_update failed, disposing peer");
                roll_back(tree, &mut self.elements, &self.app, &mut self.peers, id, peer);
            }
        }
        result
    }

    /// Dispose the peer of `id` and, through it, every peer it re-hosts.
    ///
    /// A component re-hosted by another peer is disposed by that peer only.
    pub fn dispose(&mut self, tree: &ComponentTree, id: ComponentId) -> Result<()> {
        detach(tree, &mut self.elements, &self.app, &mut self.peers, id, None)
    }

    /// Deliver input to a rendered element.
    ///
    /// Elements of a synthetic tree fire on the synthetic node, after which
    /// the owning peer re-synchronises its elements. Elements allocated
    /// directly by a peer fire on the application component. Returns the
    /// number of handlers invoked.
    pub fn dispatch_input(
        &mut self,
        tree: &mut ComponentTree,
        element: ElementHandle,
        event: &str,
        data: Option<PropertyValue>,
    ) -> Result<usize> {
        if !self.elements.contains(element) {
            return Err(SyncError::UnknownElement(element));
        }
        match self.elements.owner(element) {
            None => Ok(0),
            Some(ElementOwner::Peer(component)) => Ok(tree.fire_event(component, event, data)),
            Some(ElementOwner::Synthetic { peer: owner, component }) => {
                let (mut peer, type_key) = take_attached(&mut self.peers, owner, "dispatch input to")?;
                let fired = peer.base_mut().fire(component, event, data);
                let result = {
                    let mut update = UpdateContext::new(
                        owner,
                        UpdateFlags::NONE,
                        tree,
                        &mut self.elements,
                        &self.app,
                        &mut self.peers,
                    );
                    peer.base_mut().synchronize(&mut update)
                };
                if let Err(err) = &result {
                    warn!(%type_key, component = ?owner, %err, "synchronize failed, disposing peer");
                    roll_back(tree, &mut self.elements, &self.app, &mut self.peers, owner, peer);
                    return Err(err.clone());
                }
                restore(&mut self.peers, owner, peer);
                debug!(%type_key, component = ?owner, event, fired, "input dispatched");
                Ok(fired)
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn peer_state(&self, id: ComponentId) -> PeerState {
        state_of(&self.peers, id)
    }

    /// The peer bound to `id`, if one has been constructed.
    pub fn peer(&self, id: ComponentId) -> Option<&dyn Peer> {
        self.peers.get(&id)?.peer.as_deref()
    }

    pub fn peer_as<T: Peer>(&self, id: ComponentId) -> Option<&T> {
        self.peer(id)?.as_any().downcast_ref::<T>()
    }

    /// The peer's own top-level element. None unless attached.
    pub fn domain_element(&self, id: ComponentId) -> Option<ElementHandle> {
        if self.peer_state(id) != PeerState::Attached {
            return None;
        }
        self.peer(id)?
            .domain_element()
            .filter(|&element| self.elements.contains(element))
    }

    /// Properties a host should output for `id`: everything set on the
    /// component plus whatever its peer always outputs. Sorted, deduplicated.
    pub fn output_property_names(&self, tree: &ComponentTree, id: ComponentId) -> Result<Vec<String>> {
        let type_key = tree.type_key(id).ok_or(SyncError::UnknownComponent(id))?;
        let mut names = tree.property_names(id);
        let extras: Vec<String> = match self.peer(id) {
            Some(peer) => peer.output_properties().iter().map(|s| s.to_string()).collect(),
            None => {
                let peer = self.app.peers().lookup(type_key)?.instantiate();
                peer.output_properties().iter().map(|s| s.to_string()).collect()
            }
        };
        names.extend(extras);
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Of the `updated` property names, those a host should output for `id`:
    /// declared by its definition, set on the component, or always output
    /// by its peer. Sorted, deduplicated.
    pub fn updated_output_property_names(
        &self,
        tree: &ComponentTree,
        id: ComponentId,
        updated: &[&str],
    ) -> Result<Vec<String>> {
        let type_key = tree.type_key(id).ok_or(SyncError::UnknownComponent(id))?;
        let definition = self.app.components().lookup(type_key)?;
        let output = self.output_property_names(tree, id)?;
        let mut names: Vec<String> = updated
            .iter()
            .filter(|name| {
                definition.property_kind(name).is_some() || output.iter().any(|o| o.as_str() == **name)
            })
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Events a host must deliver synchronously for `id`: those with listeners.
    pub fn immediate_event_types(&self, tree: &ComponentTree, id: ComponentId) -> Vec<String> {
        tree.listener_events(id)
    }

    /// Forget slots of disposed peers. Returns how many were dropped.
    pub fn purge_disposed(&mut self) -> usize {
        let before = self.peers.len();
        self.peers.retain(|_, slot| slot.state != PeerState::Disposed);
        before - self.peers.len()
    }

    /// Number of peers currently attached.
    pub fn attached_count(&self) -> usize {
        self.peers
            .values()
            .filter(|slot| slot.state == PeerState::Attached)
            .count()
    }
}
