//! In-memory EventStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::actor::ActorId;
use crate::interfaces::{EventRecord, EventStore, Result, StorageError};

/// One actor's event log with its index counter.
///
/// The counter is the index authority and survives compaction: indices keep
/// ascending even after `delete_up_to` removed the oldest records.
#[derive(Default)]
struct Log {
    records: Vec<EventRecord>,
    next_index: u64,
}

/// In-memory event store.
///
/// Failure injection toggles make every operation fail with
/// `StorageError::Unavailable`, for exercising error paths in tests.
#[derive(Default)]
pub struct MemoryEventStore {
    logs: RwLock<HashMap<ActorId, Log>>,
    fail_on_append: RwLock<bool>,
    fail_on_get: RwLock<bool>,
    fail_on_delete: RwLock<bool>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_append(&self, fail: bool) {
        *self.fail_on_append.write().await = fail;
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }

    pub async fn set_fail_on_delete(&self, fail: bool) {
        *self.fail_on_delete.write().await = fail;
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, actor: &ActorId, payload: Vec<u8>) -> Result<u64> {
        if *self.fail_on_append.read().await {
            return Err(StorageError::Unavailable("append failure injected".into()));
        }
        let mut logs = self.logs.write().await;
        let log = logs.entry(actor.clone()).or_default();
        let index = log.next_index;
        log.records.push(EventRecord { index, payload });
        log.next_index = index + 1;
        Ok(index)
    }

    async fn get_from(&self, actor: &ActorId, from: u64) -> Result<Vec<EventRecord>> {
        if *self.fail_on_get.read().await {
            return Err(StorageError::Unavailable("read failure injected".into()));
        }
        let logs = self.logs.read().await;
        // Records are pushed in index order, so the filtered copy is already
        // ascending.
        Ok(logs
            .get(actor)
            .map(|log| {
                log.records
                    .iter()
                    .filter(|r| r.index >= from)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn next_index(&self, actor: &ActorId) -> Result<u64> {
        if *self.fail_on_get.read().await {
            return Err(StorageError::Unavailable("read failure injected".into()));
        }
        let logs = self.logs.read().await;
        Ok(logs.get(actor).map(|log| log.next_index).unwrap_or(0))
    }

    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        if *self.fail_on_delete.read().await {
            return Err(StorageError::Unavailable("delete failure injected".into()));
        }
        let mut logs = self.logs.write().await;
        if let Some(log) = logs.get_mut(actor) {
            log.records.retain(|r| r.index > up_to);
        }
        Ok(())
    }
}
