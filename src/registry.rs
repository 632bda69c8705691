//! Mapping from state identity to its single behaviour instance.

use crate::behaviour::{NetworkState, StateBehaviour};
use crate::core::{StateError, StateId};
use log::warn;
use std::collections::HashMap;

/// Holds exactly one [`NetworkState`] per identity.
///
/// Populated during setup; the machine never creates states on demand.
pub struct StateRegistry<K: StateId, B> {
    states: HashMap<K, NetworkState<K, B>>,
}

impl<K: StateId, B: StateBehaviour> StateRegistry<K, B> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Register `behaviour` under `id`. Last write wins; the replaced
    /// behaviour, if any, is returned.
    pub fn register(&mut self, id: K, behaviour: B) -> Option<B> {
        let previous = self
            .states
            .insert(id.clone(), NetworkState::new(id.clone(), behaviour));
        if previous.is_some() {
            warn!("state '{}' registered twice, replacing", id.name());
        }
        previous.map(NetworkState::into_behaviour)
    }

    pub fn get(&self, id: &K) -> Result<&NetworkState<K, B>, StateError> {
        self.states.get(id).ok_or_else(|| not_registered(id))
    }

    pub fn get_mut(&mut self, id: &K) -> Result<&mut NetworkState<K, B>, StateError> {
        self.states.get_mut(id).ok_or_else(|| not_registered(id))
    }

    pub fn contains(&self, id: &K) -> bool {
        self.states.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<K: StateId, B: StateBehaviour> Default for StateRegistry<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

fn not_registered<K: StateId>(id: &K) -> StateError {
    StateError::NotRegistered {
        state: id.name().to_string(),
    }
}
