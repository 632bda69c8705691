//! Core state machine types.
//!
//! This module contains the pieces every other module builds on:
//! - State identities via the `StateId` trait
//! - Authority/observer roles and the two-role `Presence` machine
//! - Ordered transition history
//! - The `StateError` taxonomy

mod error;
mod history;
mod role;
mod state;

pub use error::StateError;
pub use history::{StateHistory, TransitionRecord};
pub use role::{NetworkEdge, Presence, Role};
pub use state::StateId;
