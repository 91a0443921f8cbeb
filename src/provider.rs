//! Persistence provider adapter.
//!
//! Wraps one event store and one snapshot store and exposes
//! actor-identity-scoped operations for the recovery engine and the
//! persistence facade. The provider keeps no state of its own beyond
//! delegation; event index assignment happens in the store at append time,
//! never before.

use std::sync::Arc;

use tracing::debug;

use crate::actor::ActorId;
use crate::config::SnapshotConfig;
use crate::interfaces::{EventRecord, EventStore, Result, SnapshotRecord, SnapshotStore};

/// Identity-scoped access to one pair of stores.
///
/// Cloning is cheap; clones share the underlying store handles.
#[derive(Clone)]
pub struct PersistenceProvider {
    event_store: Arc<dyn EventStore>,
    snapshot_store: Arc<dyn SnapshotStore>,
    /// When false, snapshots are not loaded; recovery replays all events
    /// from the beginning.
    snapshot_read_enabled: bool,
    /// When false, snapshot writes are dropped (pure event sourcing).
    snapshot_write_enabled: bool,
}

impl PersistenceProvider {
    /// Create a provider with snapshots enabled.
    pub fn new(event_store: Arc<dyn EventStore>, snapshot_store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            event_store,
            snapshot_store,
            snapshot_read_enabled: true,
            snapshot_write_enabled: true,
        }
    }

    /// Create a provider with configurable snapshot behavior.
    pub fn with_config(
        event_store: Arc<dyn EventStore>,
        snapshot_store: Arc<dyn SnapshotStore>,
        snapshots: &SnapshotConfig,
    ) -> Self {
        Self {
            event_store,
            snapshot_store,
            snapshot_read_enabled: snapshots.read,
            snapshot_write_enabled: snapshots.write,
        }
    }

    /// Append one event; the store assigns and returns its index.
    pub async fn append_event(&self, actor: &ActorId, payload: Vec<u8>) -> Result<u64> {
        self.event_store.append(actor, payload).await
    }

    /// Events with index >= `from`, ascending.
    pub async fn events_from(&self, actor: &ActorId, from: u64) -> Result<Vec<EventRecord>> {
        self.event_store.get_from(actor, from).await
    }

    /// The index the next append will receive.
    pub async fn next_index(&self, actor: &ActorId) -> Result<u64> {
        self.event_store.next_index(actor).await
    }

    /// The highest-index snapshot, or `None`.
    ///
    /// Returns `None` without consulting the store when snapshot reads are
    /// disabled.
    pub async fn latest_snapshot(&self, actor: &ActorId) -> Result<Option<SnapshotRecord>> {
        if !self.snapshot_read_enabled {
            return Ok(None);
        }
        self.snapshot_store.get_latest(actor).await
    }

    /// Store a snapshot at `index`. No-op when snapshot writes are disabled.
    pub async fn put_snapshot(&self, actor: &ActorId, index: u64, payload: Vec<u8>) -> Result<()> {
        if !self.snapshot_write_enabled {
            debug!(actor = %actor, index, "snapshot writes disabled, dropping snapshot");
            return Ok(());
        }
        self.snapshot_store
            .put(actor, SnapshotRecord { index, payload })
            .await
    }

    /// Delete snapshots with index <= `up_to`. Events are never affected.
    pub async fn delete_snapshots(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        debug!(actor = %actor, up_to, "deleting snapshots");
        self.snapshot_store.delete_up_to(actor, up_to).await
    }

    /// Delete events with index <= `up_to` (compaction). Snapshots are never
    /// affected; choosing a bound that recovery still needs is the caller's
    /// responsibility.
    pub async fn delete_events(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        debug!(actor = %actor, up_to, "deleting events");
        self.event_store.delete_up_to(actor, up_to).await
    }
}
