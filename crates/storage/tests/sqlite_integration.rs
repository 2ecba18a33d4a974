use quiz_core::time::fixed_now;
use quiz_core::{BankDraft, QuestionDraft, QuizEngine, SessionSnapshot};
use storage::repository::SnapshotStore;
use storage::{SqliteStore, Storage};

fn build_snapshot(seed: u64) -> SessionSnapshot {
    let bank = BankDraft {
        title: "Sqlite Quiz".into(),
        time_limit_secs: Some(45),
        pass_threshold: Some(0.6),
        questions: vec![
            QuestionDraft {
                id: "q1".into(),
                text: "first".into(),
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_index: 2,
                topic: Some("intro".into()),
            },
            QuestionDraft {
                id: "q2".into(),
                text: "second".into(),
                options: vec!["x".into(), "y".into()],
                correct_index: 0,
                topic: None,
            },
        ],
    }
    .validate()
    .unwrap();

    let mut engine = QuizEngine::with_seed(&bank, seed, fixed_now());
    engine.select_answer(1);
    engine.tick();
    engine.snapshot()
}

// Named shared-cache databases keep every pooled connection on the same
// in-memory schema.
async fn connect(name: &str) -> SqliteStore {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let store = SqliteStore::connect(&url).await.unwrap();
    store.migrate().await.unwrap();
    store
}

#[tokio::test]
async fn round_trips_a_snapshot() {
    let store = connect("memdb_roundtrip").await;
    let snapshot = build_snapshot(1);

    store.save("quiz.state.v2", &snapshot).await.unwrap();
    let loaded = store.load("quiz.state.v2").await.unwrap();
    assert_eq!(loaded, Some(snapshot));
}

#[tokio::test]
async fn save_overwrites_the_previous_snapshot() {
    let store = connect("memdb_overwrite").await;
    let first = build_snapshot(1);
    let second = build_snapshot(2);

    store.save("k", &first).await.unwrap();
    store.save("k", &second).await.unwrap();

    let loaded = store.load("k").await.unwrap();
    assert_eq!(loaded, Some(second));
}

#[tokio::test]
async fn missing_key_loads_none_and_clear_is_idempotent() {
    let store = connect("memdb_missing").await;
    assert_eq!(store.load("absent").await.unwrap(), None);

    let snapshot = build_snapshot(3);
    store.save("k", &snapshot).await.unwrap();
    store.clear("k").await.unwrap();
    assert_eq!(store.load("k").await.unwrap(), None);
    store.clear("k").await.unwrap();
}

#[tokio::test]
async fn migrations_are_reentrant() {
    let store = connect("memdb_reentrant").await;
    store.migrate().await.unwrap();

    let snapshot = build_snapshot(4);
    store.save("k", &snapshot).await.unwrap();
    assert!(store.load("k").await.unwrap().is_some());
}

#[tokio::test]
async fn storage_aggregate_builds_a_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_aggregate?mode=memory&cache=shared")
        .await
        .unwrap();
    let snapshot = build_snapshot(5);

    storage.snapshots.save("k", &snapshot).await.unwrap();
    let loaded = storage.snapshots.load("k").await.unwrap();
    assert_eq!(loaded, Some(snapshot));
}
