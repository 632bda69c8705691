//! The replication seam between an authority and its observers.
//!
//! The authority pushes every write of its current-state pointer through a
//! [`Replicator`]. The host carries the resulting [`ReplicatedChange`] to
//! each observer however it likes and hands it to
//! [`StateMachine::on_replicated`](crate::StateMachine::on_replicated).

use crate::codec::{self, CodecError};
use crate::core::StateId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A change of the replicated current-state pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ReplicatedChange<K: StateId> {
    pub previous: Option<K>,
    pub next: Option<K>,
}

impl<K: StateId> ReplicatedChange<K> {
    pub fn new(previous: Option<K>, next: Option<K>) -> Self {
        Self { previous, next }
    }

    /// The change a freshly joined observer applies to catch up.
    pub fn join(current: Option<K>) -> Self {
        Self {
            previous: None,
            next: current,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.previous == self.next
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        codec::to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        codec::from_json(json)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        codec::from_bytes(bytes)
    }
}

/// Propagates authority-side writes toward observers.
pub trait Replicator<K: StateId> {
    fn replicate(&mut self, change: &ReplicatedChange<K>);
}

/// Replicator for machines with no observers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReplicator;

impl<K: StateId> Replicator<K> for NullReplicator {
    fn replicate(&mut self, _change: &ReplicatedChange<K>) {}
}

/// Buffers changes in write order until the host drains them.
#[derive(Clone, Debug)]
pub struct Outbox<K: StateId> {
    pending: VecDeque<ReplicatedChange<K>>,
}

impl<K: StateId> Outbox<K> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Remove and return every buffered change, oldest first.
    pub fn drain(&mut self) -> Vec<ReplicatedChange<K>> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: StateId> Default for Outbox<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId> Replicator<K> for Outbox<K> {
    fn replicate(&mut self, change: &ReplicatedChange<K>) {
        self.pending.push_back(change.clone());
    }
}

/// Replicator backed by a closure.
pub struct FnReplicator<F> {
    f: F,
}

impl<F> FnReplicator<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<K: StateId, F> Replicator<K> for FnReplicator<F>
where
    F: FnMut(&ReplicatedChange<K>),
{
    fn replicate(&mut self, change: &ReplicatedChange<K>) {
        (self.f)(change)
    }
}
