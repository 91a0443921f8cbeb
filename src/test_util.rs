//! Shared fixtures for unit tests.

use serde::{Deserialize, Serialize};

use crate::actor::EventSourced;

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

/// Encoded `Multiplied` payload, for tests that write through the provider.
pub fn encode_event(amount: i64) -> Vec<u8> {
    serde_json::to_vec(&Multiplied { amount }).unwrap()
}

/// Encoded `MultiplierSnapshot` payload.
pub fn encode_snapshot(value: i64) -> Vec<u8> {
    serde_json::to_vec(&MultiplierSnapshot { value }).unwrap()
}
