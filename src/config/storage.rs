//! Storage configuration types.

use serde::Deserialize;

/// Storage backend discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend discriminator.
    pub backend: StorageBackend,
    /// Database path (sqlite). Use `:memory:` for an ephemeral database.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: "memoir.db".to_string(),
        }
    }
}

/// Snapshot enable/disable configuration.
///
/// These flags are useful for debugging snapshot-related issues.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Read snapshots during recovery.
    /// When false, recovery always replays the full event history.
    /// Default: true
    pub read: bool,
    /// Write snapshots on `persist_snapshot`.
    /// When false, no snapshots are stored (pure event sourcing).
    /// Default: true
    pub write: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            read: true,
            write: true,
        }
    }
}
