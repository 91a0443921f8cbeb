//! Persistence facade.
//!
//! [`Persistent`] pairs a recovered actor state with its provider handle:
//! the API an actor's business logic calls during live operation. Ordering
//! is append-then-apply, so durability is established before the in-memory
//! effect; on a failed write the in-memory state is untouched.

use tracing::trace;

use crate::actor::{ActorId, EventSourced, Signal};
use crate::config::RecoveryConfig;
use crate::provider::PersistenceProvider;
use crate::recovery::{PersistenceError, Recovered, RecoveryEngine};


/// A persistence-backed actor state, ready for live operation.
///
/// Produced by [`Persistent::recover`]; holds the reconstructed state and
/// the index of the last durable event it reflects. One value owns one
/// actor identity's stream; per-identity processing is single-threaded, so
/// no internal locking is needed.
pub struct Persistent<A: EventSourced> {
    actor: ActorId,
    provider: PersistenceProvider,
    state: A,
    last_index: Option<u64>,
}

impl<A: EventSourced> Persistent<A> {
    /// Recover `actor` from durable state and return a live handle.
    pub async fn recover(
        provider: PersistenceProvider,
        actor: ActorId,
    ) -> Result<Self, PersistenceError> {
        Self::recover_with(provider, actor, &RecoveryConfig::default()).await
    }

    /// Recover with explicit recovery configuration.
    pub async fn recover_with(
        provider: PersistenceProvider,
        actor: ActorId,
        recovery: &RecoveryConfig,
    ) -> Result<Self, PersistenceError> {
        let mut engine = RecoveryEngine::with_config(provider.clone(), recovery);
        let recovered: Recovered<A> = engine.recover(&actor).await?;

        Ok(Self {
            actor,
            provider,
            state: recovered.state,
            last_index: recovered.last_index,
        })
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// The current in-memory state.
    pub fn state(&self) -> &A {
        &self.state
    }

    /// Index of the last durable event reflected in the state.
    pub fn last_index(&self) -> Option<u64> {
        self.last_index
    }

    /// Durably append `event`, then apply it to the in-memory state.
    ///
    /// Returns the assigned index. If encoding or the append fails, the
    /// state is untouched; whether to retry is the caller's decision.
    pub async fn persist_event(&mut self, event: A::Event) -> Result<u64, PersistenceError> {
        let payload = serde_json::to_vec(&event).map_err(|source| PersistenceError::Encode {
            actor: self.actor.clone(),
            source,
        })?;

        let index = self.provider.append_event(&self.actor, payload).await?;

        self.state.on_signal(Signal::PersistedEvent(event));
        self.last_index = Some(index);
        trace!(actor = %self.actor, index, "event persisted and applied");

        Ok(index)
    }

    /// Snapshot the current state.
    ///
    /// The snapshot is tagged with the index of the last durable event this
    /// state reflects; callers never supply an index, which keeps snapshots
    /// from claiming positions beyond the log. Fails with
    /// [`PersistenceError::SnapshotWithoutEvents`] when nothing has ever
    /// been persisted or recovered for this actor.
    pub async fn persist_snapshot(&self) -> Result<u64, PersistenceError> {
        let Some(index) = self.last_index else {
            return Err(PersistenceError::SnapshotWithoutEvents {
                actor: self.actor.clone(),
            });
        };

        let payload = serde_json::to_vec(&self.state.snapshot()).map_err(|source| {
            PersistenceError::Encode {
                actor: self.actor.clone(),
                source,
            }
        })?;

        self.provider
            .put_snapshot(&self.actor, index, payload)
            .await?;

        Ok(index)
    }

    /// Delete snapshots with index <= `up_to` (compaction).
    pub async fn delete_snapshots(&self, up_to: u64) -> Result<(), PersistenceError> {
        self.provider.delete_snapshots(&self.actor, up_to).await?;
        Ok(())
    }

    /// Delete events with index <= `up_to` (compaction).
    ///
    /// Choosing a bound still needed for recovery (for example after the
    /// covering snapshot was deleted) is the caller's responsibility.
    pub async fn delete_events(&self, up_to: u64) -> Result<(), PersistenceError> {
        self.provider.delete_events(&self.actor, up_to).await?;
        Ok(())
    }
}
