//! Host lifecycle events and a small fan-out for them.
//!
//! Hosts translate their own per-entity callbacks into [`NetworkEvent`]s and
//! emit them through [`NetworkHooks`]; subscribers (a state machine, a
//! timer, game code) receive them in subscription order.

use crate::core::Role;
use serde::{Deserialize, Serialize};
use std::mem::{discriminant, Discriminant};

/// Opaque identity of a connection that owns an entity.
///
/// The host assigns these; the crate only carries them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

/// Per-entity lifecycle signal from the host networking layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkEvent {
    NetworkStarted,
    NetworkStopped,
    AuthorityStarted,
    AuthorityStopped,
    ObserverStarted,
    ObserverStopped,
    /// Ownership of the entity moved, as seen by `role`. Carries the owner
    /// it moved away from, `None` when it had no owner.
    OwnershipChanged {
        role: Role,
        previous_owner: Option<OwnerId>,
    },
}

type Listener<'a> = Box<dyn FnMut(NetworkEvent) + 'a>;

/// Subscription list for [`NetworkEvent`]s.
///
/// # Example
///
/// ```rust
/// use netstate::{NetworkEvent, NetworkHooks};
///
/// let mut started = 0;
/// {
///     let mut hooks = NetworkHooks::new();
///     hooks.on(NetworkEvent::AuthorityStarted, |_| started += 1);
///     hooks.emit(NetworkEvent::AuthorityStarted);
///     hooks.emit(NetworkEvent::ObserverStarted);
/// }
/// assert_eq!(started, 1);
/// ```
#[derive(Default)]
pub struct NetworkHooks<'a> {
    listeners: Vec<(Option<Discriminant<NetworkEvent>>, Listener<'a>)>,
}

impl<'a> NetworkHooks<'a> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Subscribe to a single event kind.
    ///
    /// Matching is by variant; the payload of `event` is ignored, so any
    /// `OwnershipChanged` value subscribes to every ownership change.
    pub fn on<F>(&mut self, event: NetworkEvent, f: F)
    where
        F: FnMut(NetworkEvent) + 'a,
    {
        self.listeners.push((Some(discriminant(&event)), Box::new(f)));
    }

    /// Subscribe to every event.
    pub fn subscribe_all<F>(&mut self, f: F)
    where
        F: FnMut(NetworkEvent) + 'a,
    {
        self.listeners.push((None, Box::new(f)));
    }

    /// Deliver `event` to matching subscribers in subscription order.
    pub fn emit(&mut self, event: NetworkEvent) {
        let kind = discriminant(&event);
        for (filter, listener) in &mut self.listeners {
            if filter.map_or(true, |wanted| wanted == kind) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
