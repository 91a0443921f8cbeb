//! In-memory SnapshotStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::actor::ActorId;
use crate::interfaces::{Result, SnapshotRecord, SnapshotStore, StorageError};

/// In-memory snapshot store.
///
/// Keeps every snapshot per actor; `get_latest` picks the highest index.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<ActorId, Vec<SnapshotRecord>>>,
    fail_on_put: RwLock<bool>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_put(&self, fail: bool) {
        *self.fail_on_put.write().await = fail;
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn put(&self, actor: &ActorId, snapshot: SnapshotRecord) -> Result<()> {
        if *self.fail_on_put.read().await {
            return Err(StorageError::Unavailable("put failure injected".into()));
        }
        let mut snapshots = self.snapshots.write().await;
        let entries = snapshots.entry(actor.clone()).or_default();
        entries.retain(|s| s.index != snapshot.index);
        entries.push(snapshot);
        Ok(())
    }

    async fn get_latest(&self, actor: &ActorId) -> Result<Option<SnapshotRecord>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .get(actor)
            .and_then(|entries| entries.iter().max_by_key(|s| s.index).cloned()))
    }

    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        if let Some(entries) = snapshots.get_mut(actor) {
            entries.retain(|s| s.index > up_to);
        }
        Ok(())
    }
}
