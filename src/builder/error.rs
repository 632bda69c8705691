//! Build errors for the state machine builder.

use thiserror::Error;

/// A single problem found while validating a builder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("No states registered. Call .state(id, behaviour) at least once")]
    NoStates,

    #[error("State '{state}' registered more than once")]
    DuplicateState { state: String },

    #[error("History limit of 0 keeps nothing. Use None for unbounded history")]
    ZeroHistoryLimit,
}

/// Errors that can occur when building state machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid state machine: {}", summarize(.0))]
    Invalid(Vec<ConfigViolation>),
}

impl BuildError {
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            BuildError::Invalid(violations) => violations,
        }
    }
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
