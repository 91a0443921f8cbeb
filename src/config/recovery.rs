//! Recovery configuration.

use serde::Deserialize;

/// Recovery engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// When true, an undecodable snapshot falls back to a full event replay
    /// from index 0 instead of failing the actor's start.
    /// Default: false (the failure is surfaced and the actor does not start)
    pub fallback_on_snapshot_decode: bool,
}
