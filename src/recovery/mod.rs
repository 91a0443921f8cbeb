//! Recovery engine.
//!
//! Rebuilds an actor's in-memory state from durable storage: the latest
//! applicable snapshot (if any) as the base state, then an ordered replay of
//! every event past the snapshot bound. One engine drives one restart cycle;
//! the actor is ready for live operation only after replay completes.

use tracing::{debug, warn};

use crate::actor::{ActorId, EventSourced, Signal};
use crate::config::RecoveryConfig;
use crate::interfaces::StorageError;
use crate::provider::PersistenceProvider;

#[cfg(test)]
mod tests;

/// Errors from the typed persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Gap or duplicate detected in the event log during replay.
    ///
    /// Fatal for this actor's recovery: events are never silently skipped.
    #[error("corrupted event sequence for actor {actor}: expected index {expected}, got {actual}")]
    CorruptedSequence {
        actor: ActorId,
        expected: u64,
        actual: u64,
    },

    #[error("failed to decode snapshot at index {index} for actor {actor}: {source}")]
    SnapshotDecode {
        actor: ActorId,
        index: u64,
        source: serde_json::Error,
    },

    #[error("failed to decode event at index {index} for actor {actor}: {source}")]
    EventDecode {
        actor: ActorId,
        index: u64,
        source: serde_json::Error,
    },

    #[error("failed to encode payload for actor {actor}: {source}")]
    Encode {
        actor: ActorId,
        source: serde_json::Error,
    },

    /// `persist_snapshot` was called before anything was ever persisted, so
    /// there is no event index to tag the snapshot with.
    #[error("cannot snapshot actor {actor}: nothing has been persisted")]
    SnapshotWithoutEvents { actor: ActorId },
}

/// Phases of one recovery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPhase {
    Idle,
    LoadingSnapshot,
    ReplayingEvents,
    Ready,
}

/// Outcome of a completed recovery cycle.
#[derive(Debug)]
pub struct Recovered<A> {
    /// Reconstructed state, ready for live operation.
    pub state: A,
    /// Index of the last durable event reflected in `state`, `None` when the
    /// log is empty and no snapshot exists.
    pub last_index: Option<u64>,
    /// Number of events replayed past the snapshot bound.
    pub replayed: u64,
    /// Whether a snapshot supplied the base state.
    pub from_snapshot: bool,
}

/// Drives one recovery cycle for one actor identity.
pub struct RecoveryEngine {
    provider: PersistenceProvider,
    fallback_on_snapshot_decode: bool,
    phase: RecoveryPhase,
}

impl RecoveryEngine {
    /// Create an engine with default recovery behavior (snapshot decode
    /// failures are fatal).
    pub fn new(provider: PersistenceProvider) -> Self {
        Self {
            provider,
            fallback_on_snapshot_decode: false,
            phase: RecoveryPhase::Idle,
        }
    }

    /// Create an engine with configurable recovery behavior.
    pub fn with_config(provider: PersistenceProvider, recovery: &RecoveryConfig) -> Self {
        Self {
            provider,
            fallback_on_snapshot_decode: recovery.fallback_on_snapshot_decode,
            phase: RecoveryPhase::Idle,
        }
    }

    /// Current phase. `Ready` only after a successful [`recover`] call;
    /// a failed recovery leaves the phase at the stage that failed.
    ///
    /// [`recover`]: RecoveryEngine::recover
    pub fn phase(&self) -> RecoveryPhase {
        self.phase
    }

    /// Reconstruct the state of `actor` from durable storage.
    ///
    /// No partially-applied state escapes: on any error the actor's start
    /// has failed and the returned error is the only output.
    pub async fn recover<A: EventSourced>(
        &mut self,
        actor: &ActorId,
    ) -> Result<Recovered<A>, PersistenceError> {
        self.phase = RecoveryPhase::LoadingSnapshot;
        debug!(actor = %actor, "loading latest snapshot");

        let mut state = A::default();
        let mut cursor: Option<u64> = None;
        let mut from_snapshot = false;

        if let Some(record) = self.provider.latest_snapshot(actor).await? {
            match serde_json::from_slice::<A::Snapshot>(&record.payload) {
                Ok(snapshot) => {
                    state.on_signal(Signal::RecoverSnapshot(snapshot));
                    cursor = Some(record.index);
                    from_snapshot = true;
                }
                Err(source) if self.fallback_on_snapshot_decode => {
                    warn!(
                        actor = %actor,
                        index = record.index,
                        error = %source,
                        "snapshot undecodable, falling back to full event replay",
                    );
                }
                Err(source) => {
                    return Err(PersistenceError::SnapshotDecode {
                        actor: actor.clone(),
                        index: record.index,
                        source,
                    });
                }
            }
        }

        self.phase = RecoveryPhase::ReplayingEvents;
        let from = cursor.map(|index| index + 1).unwrap_or(0);
        let records = self.provider.events_from(actor, from).await?;

        let mut last_index = cursor;
        let mut expected = from;
        let replayed = records.len() as u64;

        for record in records {
            if record.index != expected {
                return Err(PersistenceError::CorruptedSequence {
                    actor: actor.clone(),
                    expected,
                    actual: record.index,
                });
            }
            let event: A::Event = serde_json::from_slice(&record.payload).map_err(|source| {
                PersistenceError::EventDecode {
                    actor: actor.clone(),
                    index: record.index,
                    source,
                }
            })?;
            state.on_signal(Signal::RecoverEvent(event));
            last_index = Some(record.index);
            expected += 1;
        }

        self.phase = RecoveryPhase::Ready;
        debug!(
            actor = %actor,
            replayed,
            from_snapshot,
            last_index = ?last_index,
            "recovery complete",
        );

        Ok(Recovered {
            state,
            last_index,
            replayed,
            from_snapshot,
        })
    }
}
