//! Machine configuration.

use crate::codec::{self, CodecError};
use serde::{Deserialize, Serialize};

/// What `enter` does when called on a machine without authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityPolicy {
    /// Fail with `StateError::NotAuthority`.
    #[default]
    Reject,
    /// Do nothing and report that no transition happened.
    Ignore,
}

/// Tunables for a [`StateMachine`](crate::StateMachine).
///
/// # Example
///
/// ```rust
/// use netstate::{AuthorityPolicy, MachineConfig};
///
/// let config = MachineConfig::from_json(
///     r#"{ "authority_policy": "ignore", "history_limit": 16 }"#,
/// ).unwrap();
/// assert_eq!(config.authority_policy, AuthorityPolicy::Ignore);
/// assert_eq!(config.history_limit, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub authority_policy: AuthorityPolicy,
    /// Maximum retained transition records; `None` keeps everything.
    pub history_limit: Option<usize>,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            authority_policy: AuthorityPolicy::Reject,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        codec::from_json(json)
    }

    pub fn with_authority_policy(mut self, policy: AuthorityPolicy) -> Self {
        self.authority_policy = policy;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_and_bounds_history() {
        let config = MachineConfig::default();
        assert_eq!(config.authority_policy, AuthorityPolicy::Reject);
        assert_eq!(config.history_limit, Some(DEFAULT_HISTORY_LIMIT));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn null_history_limit_is_unbounded() {
        let config = MachineConfig::from_json(r#"{ "history_limit": null }"#).unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = MachineConfig::from_json(r#"{ "authority_policy": "maybe" }"#);
        assert!(matches!(result, Err(CodecError::DeserializationFailed(_))));
    }
}
