//! Errors raised by state machine operations.

use super::role::Role;
use thiserror::Error;

/// Errors that can occur when driving a state machine.
///
/// All of these indicate a programming or configuration mistake; none are
/// transient and none are retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("State '{state}' is not registered")]
    NotRegistered { state: String },

    #[error("State '{state}' is already entered for {role}")]
    AlreadyEntered { state: String, role: Role },

    #[error("Cannot enter state '{state}' without authority")]
    NotAuthority { state: String },
}
