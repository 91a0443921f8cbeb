//! Event storage interface.

use async_trait::async_trait;

use crate::actor::ActorId;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Stores never retry internally; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A durably stored event.
///
/// The index is assigned by the store at append time: contiguous, ascending,
/// starting at 0 per actor. Records are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Position in the actor's event log.
    pub index: u64,
    /// Opaque domain event payload.
    pub payload: Vec<u8>,
}

/// Interface for event persistence.
///
/// All operations are scoped to one actor identity. Appends for the same
/// identity are serialized by the store (equivalent to a per-identity
/// monotonic counter with atomic increment-and-store); operations for
/// different identities are fully independent.
///
/// Implementations:
/// - `SqliteEventStore`: SQLite storage
/// - `MemoryEventStore`: in-memory reference implementation
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event, assigning the next index for this actor.
    ///
    /// Index assignment is atomic with respect to concurrent appends for the
    /// same identity: no two appends receive the same index.
    async fn append(&self, actor: &ActorId, payload: Vec<u8>) -> Result<u64>;

    /// Retrieve events with index >= `from`, ascending by index.
    async fn get_from(&self, actor: &ActorId, from: u64) -> Result<Vec<EventRecord>>;

    /// The index the next append will receive (0 for an unknown actor).
    ///
    /// Unaffected by compaction: deleting events never rewinds the counter.
    async fn next_index(&self, actor: &ActorId) -> Result<u64>;

    /// Delete events with index <= `up_to` (log compaction).
    ///
    /// Ordering and indices of the remaining events are unaffected; a bound
    /// matching nothing is a no-op.
    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()>;
}
