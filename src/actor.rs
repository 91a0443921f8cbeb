//! The seam between the persistence layer and an actor's state machine.
//!
//! The persistence layer never interprets domain state. It delivers
//! [`Signal`]s into an [`EventSourced`] implementation, which owns its state
//! and mutates it through a pure transition function.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque key identifying one actor's persistence stream.
///
/// Stable for the actor's lifetime; reusing the same id across restarts
/// resumes the same event log and snapshot history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identity (uuid v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Signals delivered in-process to an actor's state machine.
///
/// The kind tells the actor whether it is initializing from history or
/// reacting to a freshly durable live event; recovered and live events run
/// through the identical transition function.
pub enum Signal<A: EventSourced> {
    /// Base state loaded at the start of recovery.
    RecoverSnapshot(A::Snapshot),
    /// Historical event replayed during recovery.
    RecoverEvent(A::Event),
    /// Event that just became durable during live operation.
    PersistedEvent(A::Event),
    /// Any non-persistence message. Ignored by the default dispatch.
    Other(serde_json::Value),
}

/// An actor state machine whose state is derived from an event log.
///
/// `apply` must be pure with respect to the event sequence: replaying the
/// same snapshot and events always yields the same state. The default-
/// constructed value is the base state when no snapshot exists.
pub trait EventSourced: Default + Send + Sized {
    /// Domain event payload.
    type Event: Serialize + DeserializeOwned + Send;
    /// Point-in-time state summary.
    type Snapshot: Serialize + DeserializeOwned + Send;

    /// State transition. Used for replayed and live events alike.
    fn apply(&mut self, event: &Self::Event);

    /// Capture the current state as a snapshot payload.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the current state with a snapshot's contents.
    fn restore(&mut self, snapshot: Self::Snapshot);

    /// Dispatch one signal into the state machine.
    fn on_signal(&mut self, signal: Signal<Self>) {
        match signal {
            Signal::RecoverSnapshot(snapshot) => self.restore(snapshot),
            Signal::RecoverEvent(event) => self.apply(&event),
            Signal::PersistedEvent(event) => self.apply(&event),
            Signal::Other(_) => {}
        }
    }
}
