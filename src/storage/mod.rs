//! Storage implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::interfaces::{EventStore, SnapshotStore};

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::{MemoryEventStore, MemorySnapshotStore};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteEventStore, SqliteSnapshotStore};

/// Initialize storage based on configuration.
///
/// Returns the (EventStore, SnapshotStore) pair for the configured backend.
pub async fn init_storage(
    config: &StorageConfig,
) -> Result<(Arc<dyn EventStore>, Arc<dyn SnapshotStore>), Box<dyn std::error::Error>> {
    info!("storage: {:?} at {}", config.backend, config.path);

    match config.backend {
        StorageBackend::Memory => Ok((
            Arc::new(MemoryEventStore::new()),
            Arc::new(MemorySnapshotStore::new()),
        )),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            if config.path != ":memory:" {
                if let Some(parent) = std::path::Path::new(&config.path).parent() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.path)).await?;

            let event_store = Arc::new(SqliteEventStore::new(pool.clone()));
            event_store.init().await?;

            let snapshot_store = Arc::new(SqliteSnapshotStore::new(pool));
            snapshot_store.init().await?;

            Ok((event_store, snapshot_store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => {
            Err("sqlite storage requested but the 'sqlite' feature is not enabled".into())
        }
    }
}
