//! Memoir - event-sourced persistence for stateful actors.
//!
//! An actor's durable state is an append-only event log plus optional
//! point-in-time snapshots. On restart, state is reconstructed by loading the
//! latest applicable snapshot and replaying every event past its bound, in
//! order, through the same transition function used during live operation.

pub mod actor;
pub mod config;
pub mod facade;
pub mod interfaces;
pub mod provider;
pub mod recovery;
pub mod storage;

pub use actor::{ActorId, EventSourced, Signal};
pub use facade::Persistent;
pub use interfaces::{EventRecord, EventStore, SnapshotRecord, SnapshotStore, StorageError};
pub use provider::PersistenceProvider;
pub use recovery::{PersistenceError, Recovered, RecoveryEngine, RecoveryPhase};

#[cfg(test)]
mod test_util;
