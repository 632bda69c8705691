//! A countdown started by the authority and mirrored by observers.
//!
//! The authority starts the timer and gets back a [`TimerChange`] to ship
//! to observers. Each side then counts down locally from `update` and
//! reports `Finished` for its own role.

use crate::core::Role;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("Cannot start timer without authority")]
    NotAuthority,
}

/// Replicated timer message.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimerChange {
    Started { seconds: u32 },
}

/// Timer notification, tagged with the role it fired for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Started(Role),
    Finished(Role),
}

#[derive(Clone, Debug, Default)]
pub struct NetworkTimer {
    authority: bool,
    authority_remaining: Option<f32>,
    observer_remaining: Option<f32>,
}

impl NetworkTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_authority(&mut self, authority: bool) {
        self.authority = authority;
        if !authority {
            self.authority_remaining = None;
        }
    }

    pub fn is_authority(&self) -> bool {
        self.authority
    }

    /// Start counting down from `seconds`. Authority only.
    pub fn start(&mut self, seconds: u32) -> Result<(TimerChange, TimerEvent), TimerError> {
        if !self.authority {
            return Err(TimerError::NotAuthority);
        }
        debug!("timer started for {}s", seconds);
        self.authority_remaining = Some(seconds as f32);
        Ok((
            TimerChange::Started { seconds },
            TimerEvent::Started(Role::Authority),
        ))
    }

    /// Apply a replicated change. Deliveries of the authority's own
    /// changes are ignored.
    pub fn on_replicated(&mut self, change: &TimerChange, as_authority: bool) -> Option<TimerEvent> {
        if as_authority {
            return None;
        }
        match *change {
            TimerChange::Started { seconds } => {
                self.observer_remaining = Some(seconds as f32);
                Some(TimerEvent::Started(Role::Observer))
            }
        }
    }

    /// Advance both countdowns by `dt` seconds.
    ///
    /// A negative `dt` counts as zero and a non-finite one is ignored, so a
    /// bad frame delta never stalls or extends a countdown.
    pub fn update(&mut self, dt: f32) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if !dt.is_finite() {
            debug!("ignoring non-finite timer delta {}", dt);
            return events;
        }
        let dt = dt.max(0.0);
        if tick(&mut self.authority_remaining, dt) {
            events.push(TimerEvent::Finished(Role::Authority));
        }
        if tick(&mut self.observer_remaining, dt) {
            events.push(TimerEvent::Finished(Role::Observer));
        }
        events
    }

    /// Remaining whole seconds, truncated; the authority countdown wins
    /// when both are running.
    pub fn remaining_seconds(&self) -> u32 {
        self.authority_remaining
            .or(self.observer_remaining)
            .map_or(0, |remaining| remaining as u32)
    }

    pub fn is_running(&self) -> bool {
        self.authority_remaining.is_some() || self.observer_remaining.is_some()
    }
}

fn tick(remaining: &mut Option<f32>, dt: f32) -> bool {
    let Some(left) = remaining.as_mut() else {
        return false;
    };
    *left -= dt;
    if *left <= 0.0 {
        *remaining = None;
        return true;
    }
    false
}
