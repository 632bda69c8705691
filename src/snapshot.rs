//! Point-in-time capture of a state machine.
//!
//! A snapshot carries the replicated pointer, the roles the machine held,
//! per-state presence and the retained history. Behaviours themselves are
//! not captured.

use crate::behaviour::StateBehaviour;
use crate::codec::{self, CodecError};
use crate::core::{Presence, StateHistory, StateId};
use crate::machine::StateMachine;
use crate::replication::{ReplicatedChange, Replicator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Snapshot<K: StateId> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Replicated current-state pointer
    pub current: Option<K>,

    pub authority: bool,

    pub observing: bool,

    /// Presence of every state that has at least one role entered
    pub entered: Vec<(K, Presence)>,

    /// Retained transition history
    pub history: StateHistory<K>,
}

impl<K: StateId> Snapshot<K> {
    pub fn capture<B, R>(machine: &StateMachine<K, B, R>) -> Self
    where
        B: StateBehaviour,
        R: Replicator<K>,
    {
        let registry = machine.registry();
        let mut entered: Vec<(K, Presence)> = registry
            .ids()
            .filter_map(|id| {
                let presence = registry.get(id).ok()?.presence();
                presence
                    .is_network_entered()
                    .then(|| (id.clone(), presence))
            })
            .collect();
        entered.sort_by(|a, b| a.0.name().cmp(b.0.name()));

        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current: machine.current().cloned(),
            authority: machine.is_authority(),
            observing: machine.is_observing(),
            entered,
            history: machine.history().clone(),
        }
    }

    /// The change an observer applies to catch up to this snapshot.
    pub fn join_change(&self) -> ReplicatedChange<K> {
        ReplicatedChange::join(self.current.clone())
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        codec::to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let snapshot: Self = codec::from_json(json)?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let snapshot: Self = codec::from_bytes(bytes)?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    fn validate_version(&self) -> Result<(), CodecError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}
