//! Per-state callback surface and its role-aware entry guard.
//!
//! A [`StateBehaviour`] carries the hooks a concrete state wants to run.
//! [`NetworkState`] wraps it with the state's identity and a [`Presence`]
//! so that each role can be entered at most once and the network-level
//! hooks fire only on the first-in/last-out edges.

use crate::core::{NetworkEdge, Presence, Role, StateError, StateId};
use log::debug;

/// Hooks invoked as a state is entered and exited.
///
/// Every hook defaults to a no-op. Implementors override what they need,
/// e.g. enabling a spawner on `enter_authority` or toggling visuals on
/// `enter_observer`.
///
/// # Example
///
/// ```rust
/// use netstate::StateBehaviour;
///
/// #[derive(Default)]
/// struct Countdown {
///     ticks: u32,
/// }
///
/// impl StateBehaviour for Countdown {
///     fn enter_authority(&mut self) {
///         self.ticks = 3;
///     }
/// }
/// ```
pub trait StateBehaviour {
    /// Either role became entered while neither was before.
    fn enter_network(&mut self) {}

    /// Neither role remains entered.
    fn exit_network(&mut self) {}

    fn enter_authority(&mut self) {}

    fn exit_authority(&mut self) {}

    fn enter_observer(&mut self) {}

    fn exit_observer(&mut self) {}
}

impl<B: StateBehaviour + ?Sized> StateBehaviour for Box<B> {
    fn enter_network(&mut self) {
        (**self).enter_network()
    }

    fn exit_network(&mut self) {
        (**self).exit_network()
    }

    fn enter_authority(&mut self) {
        (**self).enter_authority()
    }

    fn exit_authority(&mut self) {
        (**self).exit_authority()
    }

    fn enter_observer(&mut self) {
        (**self).enter_observer()
    }

    fn exit_observer(&mut self) {
        (**self).exit_observer()
    }
}

/// A registered state: identity, behaviour, and which roles have it entered.
#[derive(Debug)]
pub struct NetworkState<K: StateId, B> {
    id: K,
    behaviour: B,
    presence: Presence,
}

impl<K: StateId, B: StateBehaviour> NetworkState<K, B> {
    pub fn new(id: K, behaviour: B) -> Self {
        Self {
            id,
            behaviour,
            presence: Presence::Absent,
        }
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn behaviour(&self) -> &B {
        &self.behaviour
    }

    pub fn behaviour_mut(&mut self) -> &mut B {
        &mut self.behaviour
    }

    pub fn into_behaviour(self) -> B {
        self.behaviour
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_entered(&self, role: Role) -> bool {
        self.presence.is_entered(role)
    }

    pub fn is_network_entered(&self) -> bool {
        self.presence.is_network_entered()
    }

    /// Enter this state for `role`.
    ///
    /// Fires `enter_network` first when this is the first role in, then the
    /// role hook. Entering a role that is already entered fails and fires
    /// nothing.
    pub fn enter(&mut self, role: Role) -> Result<(), StateError> {
        let (next, edge) =
            self.presence
                .enter(role)
                .ok_or_else(|| StateError::AlreadyEntered {
                    state: self.id.name().to_string(),
                    role,
                })?;
        self.presence = next;
        debug!("entering state '{}' for {}", self.id.name(), role);

        if edge == NetworkEdge::Rising {
            self.behaviour.enter_network();
        }
        match role {
            Role::Authority => self.behaviour.enter_authority(),
            Role::Observer => self.behaviour.enter_observer(),
        }
        Ok(())
    }

    /// Exit this state for `role`.
    ///
    /// Fires the role hook, clears the role, then fires `exit_network` when
    /// no role remains entered. Returns `false` without firing anything if
    /// `role` was not entered.
    pub fn exit(&mut self, role: Role) -> bool {
        let Some((next, edge)) = self.presence.exit(role) else {
            debug!(
                "state '{}' is not entered for {}, skipping exit",
                self.id.name(),
                role
            );
            return false;
        };
        debug!("exiting state '{}' for {}", self.id.name(), role);

        match role {
            Role::Authority => self.behaviour.exit_authority(),
            Role::Observer => self.behaviour.exit_observer(),
        }
        self.presence = next;

        if edge == NetworkEdge::Falling {
            self.behaviour.exit_network();
        }
        true
    }
}
