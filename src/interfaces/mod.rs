//! Abstract interfaces for memoir components.
//!
//! These traits define the contracts for:
//! - Event storage (the append-only log)
//! - Snapshot storage (replay-cost optimization)

pub mod event_store;
pub mod snapshot_store;

pub use event_store::{EventRecord, EventStore, Result, StorageError};
pub use snapshot_store::{SnapshotRecord, SnapshotStore};
