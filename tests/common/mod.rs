//! Shared fixtures for integration tests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use memoir::{EventSourced, PersistenceProvider};
use memoir::storage::{MemoryEventStore, MemorySnapshotStore};

/// Test actor: state is a running product, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiplier {
    pub value: i64,
}

impl Default for Multiplier {
    fn default() -> Self {
        Self { value: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Multiplied {
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierSnapshot {
    pub value: i64,
}

impl EventSourced for Multiplier {
    type Event = Multiplied;
    type Snapshot = MultiplierSnapshot;

    fn apply(&mut self, event: &Multiplied) {
        self.value *= event.amount;
    }

    fn snapshot(&self) -> MultiplierSnapshot {
        MultiplierSnapshot { value: self.value }
    }

    fn restore(&mut self, snapshot: MultiplierSnapshot) {
        self.value = snapshot.value;
    }
}

/// Provider over fresh in-memory stores.
#[allow(dead_code)] // not every test binary uses the memory backend
pub fn memory_provider() -> PersistenceProvider {
    init_tracing();
    PersistenceProvider::new(
        Arc::new(MemoryEventStore::new()),
        Arc::new(MemorySnapshotStore::new()),
    )
}

/// Install the test subscriber; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
