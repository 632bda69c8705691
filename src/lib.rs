//! Netstate: a networked state machine
//!
//! An authority owns a state machine's current-state pointer and drives
//! transitions; every write is replicated to observers, which run their own
//! enter/exit hooks when the change reaches them. A single machine may hold
//! both roles at once, as a listen server does, and each state tracks the
//! two roles independently.
//!
//! # Core Concepts
//!
//! - **StateId**: explicit, comparable state identity
//! - **StateBehaviour**: per-state hooks for each role and for the network as a whole
//! - **StateMachine**: authority-side `enter`, observer-side `on_replicated`
//! - **Replicator**: the seam through which writes leave the authority
//!
//! # Example
//!
//! ```rust
//! use netstate::{state_id, Outbox, StateBehaviour, StateMachineBuilder};
//!
//! state_id! {
//!     enum Phase {
//!         Idle,
//!         Running,
//!     }
//! }
//!
//! struct Spawner {
//!     enabled: bool,
//! }
//!
//! impl StateBehaviour for Spawner {
//!     fn enter_authority(&mut self) {
//!         self.enabled = true;
//!     }
//!     fn exit_authority(&mut self) {
//!         self.enabled = false;
//!     }
//! }
//!
//! let mut server = StateMachineBuilder::new()
//!     .state(Phase::Idle, Spawner { enabled: false })
//!     .state(Phase::Running, Spawner { enabled: false })
//!     .replicator(Outbox::new())
//!     .build()
//!     .unwrap();
//! server.on_authority_started();
//! server.enter(Phase::Running).unwrap();
//!
//! let mut client = StateMachineBuilder::new()
//!     .state(Phase::Idle, Spawner { enabled: false })
//!     .state(Phase::Running, Spawner { enabled: false })
//!     .build()
//!     .unwrap();
//! client.on_observer_started().unwrap();
//! for change in server.replicator_mut().drain() {
//!     client.on_replicated(&change, false).unwrap();
//! }
//!
//! assert_eq!(client.current(), Some(&Phase::Running));
//! assert!(server.current_state().unwrap().behaviour().enabled);
//! ```

pub mod behaviour;
pub mod builder;
pub mod codec;
pub mod config;
pub mod core;
pub mod hooks;
pub mod machine;
pub mod registry;
pub mod replication;
pub mod snapshot;
pub mod timer;

// Re-export commonly used types
pub use behaviour::{NetworkState, StateBehaviour};
pub use builder::{BuildError, ConfigViolation, StateMachineBuilder};
pub use codec::CodecError;
pub use config::{AuthorityPolicy, MachineConfig};
pub use crate::core::{Presence, Role, StateError, StateHistory, StateId, TransitionRecord};
pub use hooks::{NetworkEvent, NetworkHooks, OwnerId};
pub use machine::StateMachine;
pub use registry::StateRegistry;
pub use replication::{FnReplicator, NullReplicator, Outbox, ReplicatedChange, Replicator};
pub use snapshot::Snapshot;
pub use timer::{NetworkTimer, TimerChange, TimerEvent};
