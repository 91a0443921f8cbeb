use std::sync::Arc;

use super::*;
use crate::config::SnapshotConfig;
use crate::storage::{MemoryEventStore, MemorySnapshotStore};
use crate::test_util::{encode_event, encode_snapshot, Multiplier};

fn provider() -> PersistenceProvider {
    PersistenceProvider::new(
        Arc::new(MemoryEventStore::new()),
        Arc::new(MemorySnapshotStore::new()),
    )
}

async fn append_amounts(provider: &PersistenceProvider, actor: &ActorId, amounts: &[i64]) {
    for &amount in amounts {
        provider
            .append_event(actor, encode_event(amount))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_empty_store_recovers_default_state() {
    let provider = provider();
    let actor = ActorId::new("counter");

    let mut engine = RecoveryEngine::new(provider);
    assert_eq!(engine.phase(), RecoveryPhase::Idle);

    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();
    assert_eq!(engine.phase(), RecoveryPhase::Ready);
    assert_eq!(recovered.state.value, 1);
    assert_eq!(recovered.last_index, None);
    assert_eq!(recovered.replayed, 0);
    assert!(!recovered.from_snapshot);
}

#[tokio::test]
async fn test_full_replay_without_snapshot() {
    let provider = provider();
    let actor = ActorId::new("counter");
    append_amounts(&provider, &actor, &[2, 3, 4]).await;

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();

    assert_eq!(recovered.state.value, 24);
    assert_eq!(recovered.last_index, Some(2));
    assert_eq!(recovered.replayed, 3);
    assert!(!recovered.from_snapshot);
}

#[tokio::test]
async fn test_snapshot_bounds_replay() {
    let provider = provider();
    let actor = ActorId::new("counter");

    // Events 0..=3, snapshot at index 1 summarizing 2*2. A correct recovery
    // applies the snapshot and only events 2 and 3.
    append_amounts(&provider, &actor, &[2, 2, 4, 8]).await;
    provider
        .put_snapshot(&actor, 1, encode_snapshot(4))
        .await
        .unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();

    assert_eq!(recovered.state.value, 128);
    assert_eq!(recovered.last_index, Some(3));
    assert_eq!(recovered.replayed, 2);
    assert!(recovered.from_snapshot);
}

#[tokio::test]
async fn test_snapshot_precedence_never_replays_covered_events() {
    let provider = provider();
    let actor = ActorId::new("counter");

    // A snapshot that deliberately disagrees with the events it covers: if
    // any event with index <= 1 were replayed, the product would differ.
    append_amounts(&provider, &actor, &[3, 5]).await;
    provider
        .put_snapshot(&actor, 1, encode_snapshot(1000))
        .await
        .unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();
    assert_eq!(recovered.state.value, 1000);
    assert_eq!(recovered.replayed, 0);
}

#[tokio::test]
async fn test_snapshot_at_highest_event_index_restores_without_replay() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 2]).await;
    provider
        .put_snapshot(&actor, 1, encode_snapshot(4))
        .await
        .unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();

    assert_eq!(recovered.state.value, 4);
    assert_eq!(recovered.last_index, Some(1));
    assert_eq!(recovered.replayed, 0);
}

#[tokio::test]
async fn test_events_compacted_below_snapshot_bound() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 2, 4]).await;
    provider
        .put_snapshot(&actor, 1, encode_snapshot(4))
        .await
        .unwrap();
    provider.delete_events(&actor, 1).await.unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();
    assert_eq!(recovered.state.value, 16);
}

#[tokio::test]
async fn test_deleted_snapshots_fall_back_to_full_history() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 2, 4, 8]).await;
    provider
        .put_snapshot(&actor, 1, encode_snapshot(4))
        .await
        .unwrap();
    provider.delete_snapshots(&actor, 3).await.unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();

    assert_eq!(recovered.state.value, 128);
    assert!(!recovered.from_snapshot);
    assert_eq!(recovered.replayed, 4);
}

#[tokio::test]
async fn test_recovery_is_idempotent() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 3]).await;
    provider
        .put_snapshot(&actor, 0, encode_snapshot(2))
        .await
        .unwrap();

    let first: Recovered<Multiplier> = RecoveryEngine::new(provider.clone())
        .recover(&actor)
        .await
        .unwrap();
    let second: Recovered<Multiplier> = RecoveryEngine::new(provider)
        .recover(&actor)
        .await
        .unwrap();

    assert_eq!(first.state.value, second.state.value);
    assert_eq!(first.last_index, second.last_index);
}

#[tokio::test]
async fn test_gap_in_event_log_fails_recovery() {
    let provider = provider();
    let actor = ActorId::new("counter");

    // Compacting without a covering snapshot leaves the log starting at
    // index 2; replay must refuse to skip the missing prefix.
    append_amounts(&provider, &actor, &[2, 2, 4]).await;
    provider.delete_events(&actor, 1).await.unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let err = engine
        .recover::<Multiplier>(&actor)
        .await
        .unwrap_err();

    match err {
        PersistenceError::CorruptedSequence {
            expected, actual, ..
        } => {
            assert_eq!(expected, 0);
            assert_eq!(actual, 2);
        }
        other => panic!("expected CorruptedSequence, got {other}"),
    }
    assert_eq!(engine.phase(), RecoveryPhase::ReplayingEvents);
}

#[tokio::test]
async fn test_undecodable_snapshot_is_fatal_by_default() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 2]).await;
    provider
        .put_snapshot(&actor, 1, b"not json".to_vec())
        .await
        .unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let err = engine.recover::<Multiplier>(&actor).await.unwrap_err();
    assert!(matches!(err, PersistenceError::SnapshotDecode { .. }));
    assert_eq!(engine.phase(), RecoveryPhase::LoadingSnapshot);
}

#[tokio::test]
async fn test_undecodable_snapshot_falls_back_when_configured() {
    let provider = provider();
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2, 2]).await;
    provider
        .put_snapshot(&actor, 1, b"not json".to_vec())
        .await
        .unwrap();

    let recovery = RecoveryConfig {
        fallback_on_snapshot_decode: true,
    };
    let mut engine = RecoveryEngine::with_config(provider, &recovery);
    let recovered: Recovered<Multiplier> = engine.recover(&actor).await.unwrap();

    assert_eq!(recovered.state.value, 4);
    assert!(!recovered.from_snapshot);
    assert_eq!(recovered.replayed, 2);
}

#[tokio::test]
async fn test_undecodable_event_is_fatal() {
    let provider = provider();
    let actor = ActorId::new("counter");

    provider
        .append_event(&actor, b"not json".to_vec())
        .await
        .unwrap();

    let mut engine = RecoveryEngine::new(provider);
    let err = engine.recover::<Multiplier>(&actor).await.unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::EventDecode { index: 0, .. }
    ));
}

#[tokio::test]
async fn test_snapshot_read_disabled_replays_everything() {
    let event_store = Arc::new(MemoryEventStore::new());
    let snapshot_store = Arc::new(MemorySnapshotStore::new());
    let writer = PersistenceProvider::new(event_store.clone(), snapshot_store.clone());
    let actor = ActorId::new("counter");

    append_amounts(&writer, &actor, &[2, 2, 4]).await;
    writer
        .put_snapshot(&actor, 1, encode_snapshot(4))
        .await
        .unwrap();

    let no_read = PersistenceProvider::with_config(
        event_store,
        snapshot_store,
        &SnapshotConfig {
            read: false,
            write: true,
        },
    );
    let recovered: Recovered<Multiplier> = RecoveryEngine::new(no_read)
        .recover(&actor)
        .await
        .unwrap();

    assert_eq!(recovered.state.value, 16);
    assert!(!recovered.from_snapshot);
    assert_eq!(recovered.replayed, 3);
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_failed_start() {
    let event_store = Arc::new(MemoryEventStore::new());
    let provider = PersistenceProvider::new(event_store.clone(), Arc::new(MemorySnapshotStore::new()));
    let actor = ActorId::new("counter");

    append_amounts(&provider, &actor, &[2]).await;
    event_store.set_fail_on_get(true).await;

    let mut engine = RecoveryEngine::new(provider);
    let err = engine.recover::<Multiplier>(&actor).await.unwrap_err();
    assert!(matches!(err, PersistenceError::Storage(_)));
}
