//! State identity trait.
//!
//! A state machine addresses its states by an explicit, comparable tag
//! rather than by the concrete type of the behaviour behind it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Stable key distinguishing one logical state from another within a
/// single state machine.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: identities key the registry
/// - `Debug`: identities appear in errors and logs
/// - `Serialize` + `Deserialize`: identities travel in replicated changes
///
/// # Example
///
/// ```rust
/// use netstate::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase {
///     Lobby,
///     Playing,
///     Results,
/// }
///
/// impl StateId for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::Lobby => "Lobby",
///             Self::Playing => "Playing",
///             Self::Results => "Results",
///         }
///     }
/// }
///
/// assert_eq!(Phase::Playing.name(), "Playing");
/// ```
pub trait StateId:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Human readable name used for logging and error messages.
    fn name(&self) -> &str;
}

impl StateId for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
