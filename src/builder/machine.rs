//! Builder for constructing state machines.

use crate::behaviour::StateBehaviour;
use crate::builder::error::{BuildError, ConfigViolation};
use crate::config::MachineConfig;
use crate::core::StateId;
use crate::machine::StateMachine;
use crate::registry::StateRegistry;
use crate::replication::{NullReplicator, Replicator};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike [`StateRegistry::register`], registering the same identity twice
/// here is reported as an error by [`build`](Self::build).
pub struct StateMachineBuilder<K: StateId, B, R = NullReplicator> {
    states: Vec<(K, B)>,
    replicator: R,
    config: MachineConfig,
}

impl<K: StateId, B: StateBehaviour> StateMachineBuilder<K, B> {
    /// Create a new builder with no replicator and default configuration.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            replicator: NullReplicator,
            config: MachineConfig::default(),
        }
    }
}

impl<K: StateId, B: StateBehaviour> Default for StateMachineBuilder<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, B, R> StateMachineBuilder<K, B, R>
where
    K: StateId,
    B: StateBehaviour,
    R: Replicator<K>,
{
    /// Register a state.
    pub fn state(mut self, id: K, behaviour: B) -> Self {
        self.states.push((id, behaviour));
        self
    }

    /// Register several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = (K, B)>) -> Self {
        self.states.extend(states);
        self
    }

    /// Replace the replicator.
    pub fn replicator<R2: Replicator<K>>(self, replicator: R2) -> StateMachineBuilder<K, B, R2> {
        StateMachineBuilder {
            states: self.states,
            replicator,
            config: self.config,
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the state machine.
    ///
    /// Every problem is reported at once rather than stopping at the first.
    pub fn build(self) -> Result<StateMachine<K, B, R>, BuildError> {
        let checks = vec![
            self.check_not_empty(),
            self.check_unique(),
            self.check_history_limit(),
        ];

        match Validation::all_vec(checks) {
            Validation::Success(_) => {}
            Validation::Failure(errors) => {
                return Err(BuildError::Invalid(errors.iter().cloned().collect()))
            }
        }

        let mut registry = StateRegistry::new();
        for (id, behaviour) in self.states {
            registry.register(id, behaviour);
        }
        Ok(StateMachine::new(registry, self.replicator, self.config))
    }

    fn check_not_empty(&self) -> Check {
        if self.states.is_empty() {
            Validation::fail(ConfigViolation::NoStates)
        } else {
            Validation::success(())
        }
    }

    fn check_unique(&self) -> Check {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut checks: Vec<Check> = Vec::new();
        for (id, _) in &self.states {
            if !seen.insert(id) && reported.insert(id) {
                checks.push(Validation::fail(ConfigViolation::DuplicateState {
                    state: id.name().to_string(),
                }));
            }
        }
        Validation::all_vec(checks).map(|_| ())
    }

    fn check_history_limit(&self) -> Check {
        if self.config.history_limit == Some(0) {
            Validation::fail(ConfigViolation::ZeroHistoryLimit)
        } else {
            Validation::success(())
        }
    }
}
