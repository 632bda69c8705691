//! Transition history of the replicated current-state pointer.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single authority-side write of the current-state pointer.
///
/// `None` on either side means "no current state": a machine that has just
/// gained authority starts with nothing current, and a reset clears it.
///
/// # Example
///
/// ```rust
/// use netstate::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: None,
///     to: Some(String::from("Lobby")),
///     timestamp: Utc::now(),
/// };
/// assert!(record.from.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<K: StateId> {
    /// The state that was current before the write
    pub from: Option<K>,
    /// The state that is current after the write
    pub to: Option<K>,
    /// When the write happened
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions, optionally bounded.
///
/// When a limit is set the oldest records are dropped first.
///
/// # Example
///
/// ```rust
/// use netstate::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(TransitionRecord {
///         from: None,
///         to: Some(String::from("Lobby")),
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: Some(String::from("Lobby")),
///         to: Some(String::from("Playing")),
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // (none) -> Lobby -> Playing
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<K: StateId> {
    transitions: VecDeque<TransitionRecord<K>>,
    limit: Option<usize>,
}

impl<K: StateId> Default for StateHistory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId> StateHistory<K> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The receiver is left untouched.
    pub fn record(&self, transition: TransitionRecord<K>) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Record a transition in place.
    pub fn push(&mut self, transition: TransitionRecord<K>) {
        if self.limit == Some(0) {
            return;
        }
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// Get the sequence of pointer values traversed.
    ///
    /// Returns the `from` value of the oldest retained record followed by
    /// the `to` value of every record.
    pub fn get_path(&self) -> Vec<Option<&K>> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_ref());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_ref());
        }
        path
    }

    /// Time between the oldest and newest retained record.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.transitions.back()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
