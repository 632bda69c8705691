//! The networked state machine.
//!
//! The authority drives transitions synchronously through [`StateMachine::enter`];
//! each write of the current-state pointer is pushed through the machine's
//! [`Replicator`]. Observers feed the resulting changes back in through
//! [`StateMachine::on_replicated`], which runs the observer-role hooks.

use crate::behaviour::{NetworkState, StateBehaviour};
use crate::config::{AuthorityPolicy, MachineConfig};
use crate::core::{Role, StateError, StateHistory, StateId, TransitionRecord};
use crate::hooks::NetworkEvent;
use crate::registry::StateRegistry;
use crate::replication::{NullReplicator, ReplicatedChange, Replicator};
use chrono::Utc;
use log::debug;

/// State machine whose current state is owned by an authority and
/// replicated to observers.
///
/// A single instance may hold both roles at once (a listen server), in
/// which case each registered state tracks the two roles independently.
pub struct StateMachine<K: StateId, B, R = NullReplicator> {
    registry: StateRegistry<K, B>,
    current: Option<K>,
    observed: Option<K>,
    authority: bool,
    observing: bool,
    replicator: R,
    config: MachineConfig,
    history: StateHistory<K>,
}

impl<K, B, R> StateMachine<K, B, R>
where
    K: StateId,
    B: StateBehaviour,
    R: Replicator<K>,
{
    /// Create a machine over an already populated registry.
    ///
    /// The machine starts with neither role and no current state; the host
    /// grants roles through the lifecycle calls.
    pub fn new(registry: StateRegistry<K, B>, replicator: R, config: MachineConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        Self {
            registry,
            current: None,
            observed: None,
            authority: false,
            observing: false,
            replicator,
            config,
            history,
        }
    }

    /// Transition to `id`. Authority only.
    ///
    /// Returns `Ok(false)` when the call was ignored because this machine
    /// lacks authority and the policy is [`AuthorityPolicy::Ignore`].
    pub fn enter(&mut self, id: K) -> Result<bool, StateError> {
        self.enter_with(id, |_| {})
    }

    /// Transition to `id`, applying `configure` to its behaviour before it
    /// is entered. Authority only.
    ///
    /// The sequence is: look up the target, configure it, exit the current
    /// state for the authority role, install and replicate the new pointer,
    /// then enter the target for the authority role. An unknown `id` fails
    /// before anything changes.
    ///
    /// Entering the state that is already current re-runs its authority
    /// hooks but neither records nor replicates a change.
    pub fn enter_with<F>(&mut self, id: K, configure: F) -> Result<bool, StateError>
    where
        F: FnOnce(&mut B),
    {
        if !self.authority {
            match self.config.authority_policy {
                AuthorityPolicy::Reject => {
                    return Err(StateError::NotAuthority {
                        state: id.name().to_string(),
                    })
                }
                AuthorityPolicy::Ignore => {
                    debug!("ignoring enter '{}' without authority", id.name());
                    return Ok(false);
                }
            }
        }

        configure(self.registry.get_mut(&id)?.behaviour_mut());

        if let Some(previous) = self.current.clone() {
            self.registry.get_mut(&previous)?.exit(Role::Authority);
        }
        self.write_current(Some(id.clone()));
        self.registry.get_mut(&id)?.enter(Role::Authority)?;
        Ok(true)
    }

    /// React to a replicated pointer change.
    ///
    /// Changes delivered for the authority's own writes (`as_authority`)
    /// are ignored since `enter` already ran the authority hooks. Changes
    /// arriving while not observing are dropped. Both sides of the change
    /// are validated before any hook runs.
    ///
    /// On the authority the observer role follows its own pointer, so a
    /// change whose `previous` is not the state it last observed was queued
    /// before [`on_observer_started`](Self::on_observer_started) joined and
    /// is skipped.
    pub fn on_replicated(
        &mut self,
        change: &ReplicatedChange<K>,
        as_authority: bool,
    ) -> Result<(), StateError> {
        if as_authority {
            return Ok(());
        }
        if !self.observing {
            debug!("dropping replicated change while not observing");
            return Ok(());
        }
        for id in change.previous.iter().chain(change.next.iter()) {
            self.registry.get(id)?;
        }
        if self.authority && change.previous != self.observed {
            debug!("skipping change queued before the observer joined");
            return Ok(());
        }

        if let Some(previous) = &change.previous {
            self.registry.get_mut(previous)?.exit(Role::Observer);
        }
        if !self.authority {
            self.current = change.next.clone();
        }
        self.observed = None;
        if let Some(next) = &change.next {
            self.registry.get_mut(next)?.enter(Role::Observer)?;
            self.observed = Some(next.clone());
        }
        Ok(())
    }

    /// This machine just became authoritative.
    ///
    /// A freshly authoritative machine has no current state and must be
    /// driven into one explicitly.
    ///
    /// Only the authority role is exited here. If the cleared state is also
    /// entered for the observer role (a listen server), it stays entered
    /// until the host delivers the replicated `X -> None` clear back through
    /// [`on_replicated`](Self::on_replicated).
    pub fn on_authority_started(&mut self) {
        self.authority = true;
        if let Some(current) = self.current.clone() {
            if let Ok(state) = self.registry.get_mut(&current) {
                state.exit(Role::Authority);
            }
            self.write_current(None);
        }
    }

    /// This machine stopped being authoritative.
    ///
    /// Exits the current state for the authority role; the pointer itself
    /// is left as is.
    pub fn on_authority_stopped(&mut self) {
        self.exit_current(Role::Authority);
        self.authority = false;
    }

    /// This machine started observing.
    ///
    /// On a machine that is also the authority the current state is entered
    /// for the observer role right away, as a remote observer would on
    /// receiving [`join_change`](Self::join_change).
    pub fn on_observer_started(&mut self) -> Result<(), StateError> {
        self.observing = true;
        if self.authority {
            let join = self.join_change();
            self.on_replicated(&join, false)?;
        }
        Ok(())
    }

    /// This machine stopped observing.
    ///
    /// Exits the last observed state for the observer role. A machine
    /// without authority forgets the pointer it was following.
    pub fn on_observer_stopped(&mut self) {
        if let Some(observed) = self.observed.take() {
            if let Ok(state) = self.registry.get_mut(&observed) {
                state.exit(Role::Observer);
            }
        }
        self.observing = false;
        if !self.authority {
            self.current = None;
        }
    }

    /// Route a host lifecycle event to the matching lifecycle call.
    pub fn handle(&mut self, event: NetworkEvent) -> Result<(), StateError> {
        match event {
            NetworkEvent::AuthorityStarted => self.on_authority_started(),
            NetworkEvent::AuthorityStopped => self.on_authority_stopped(),
            NetworkEvent::ObserverStarted => self.on_observer_started()?,
            NetworkEvent::ObserverStopped => self.on_observer_stopped(),
            NetworkEvent::NetworkStarted
            | NetworkEvent::NetworkStopped
            | NetworkEvent::OwnershipChanged { .. } => {}
        }
        Ok(())
    }

    /// The change a newly joined observer applies to catch up.
    pub fn join_change(&self) -> ReplicatedChange<K> {
        ReplicatedChange::join(self.current.clone())
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    pub fn current_state(&self) -> Option<&NetworkState<K, B>> {
        self.current
            .as_ref()
            .and_then(|id| self.registry.get(id).ok())
    }

    pub fn state(&self, id: &K) -> Result<&NetworkState<K, B>, StateError> {
        self.registry.get(id)
    }

    pub fn state_mut(&mut self, id: &K) -> Result<&mut NetworkState<K, B>, StateError> {
        self.registry.get_mut(id)
    }

    pub fn is_authority(&self) -> bool {
        self.authority
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn history(&self) -> &StateHistory<K> {
        &self.history
    }

    pub fn registry(&self) -> &StateRegistry<K, B> {
        &self.registry
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn replicator(&self) -> &R {
        &self.replicator
    }

    pub fn replicator_mut(&mut self) -> &mut R {
        &mut self.replicator
    }

    fn exit_current(&mut self, role: Role) {
        if let Some(current) = &self.current {
            if let Ok(state) = self.registry.get_mut(current) {
                state.exit(role);
            }
        }
    }

    fn write_current(&mut self, next: Option<K>) {
        if self.current == next {
            return;
        }
        let previous = std::mem::replace(&mut self.current, next.clone());
        debug!(
            "current state {} -> {}",
            previous.as_ref().map_or("(none)", |k| k.name()),
            next.as_ref().map_or("(none)", |k| k.name())
        );
        self.history.push(TransitionRecord {
            from: previous.clone(),
            to: next.clone(),
            timestamp: Utc::now(),
        });
        self.replicator
            .replicate(&ReplicatedChange::new(previous, next));
    }
}
