//! In-memory storage backend.
//!
//! The reference implementation of the store contracts: per-actor event logs
//! and snapshot sets behind async locks. Serves as the test double and as an
//! embeddable ephemeral backend; recovery exercises the same engine code path
//! as the durable backends.

mod event_store;
mod snapshot_store;

pub use event_store::MemoryEventStore;
pub use snapshot_store::MemorySnapshotStore;
