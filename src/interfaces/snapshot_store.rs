//! Snapshot storage interface.

use async_trait::async_trait;

use super::event_store::Result;
use crate::actor::ActorId;

/// A stored point-in-time state summary.
///
/// `index` marks the event-log position the snapshot summarizes: the state
/// after applying events up to and including that index. Recovery replays
/// only events with a higher index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Event-log position this snapshot reflects.
    pub index: u64,
    /// Opaque state payload.
    pub payload: Vec<u8>,
}

/// Interface for snapshot persistence.
///
/// Snapshots are an optimization to avoid replaying entire event history.
/// Multiple snapshots may exist per actor; recovery uses the one with the
/// highest index. Snapshot operations never touch event storage.
///
/// Implementations:
/// - `SqliteSnapshotStore`: SQLite storage
/// - `MemorySnapshotStore`: in-memory reference implementation
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store a snapshot. Replaces an existing snapshot at the same index.
    async fn put(&self, actor: &ActorId, snapshot: SnapshotRecord) -> Result<()>;

    /// Retrieve the snapshot with the highest index, or `None`.
    async fn get_latest(&self, actor: &ActorId) -> Result<Option<SnapshotRecord>>;

    /// Delete snapshots with index <= `up_to`; no-op if none match.
    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()>;
}
