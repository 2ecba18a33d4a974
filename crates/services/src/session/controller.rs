use std::sync::Arc;

use quiz_core::{Clock, QuestionBank, QuizEngine, QuizSummary};
use storage::repository::SnapshotStore;

use super::view::SessionView;

/// Default storage key for the single-user session snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "quiz.state.v2";

/// Whether the write-back after a mutation reached storage.
///
/// Persistence is best-effort: a failed save is logged and reported here,
/// never raised as an error, so navigation, selection, and ticks always
/// succeed from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SaveOutcome {
    Persisted,
    Failed,
}

impl SaveOutcome {
    #[must_use]
    pub fn is_persisted(self) -> bool {
        matches!(self, SaveOutcome::Persisted)
    }
}

/// Result of one timer tick, enough for the host to update the countdown
/// and stop its interval once the session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_secs: u32,
    pub is_finished: bool,
    pub saved: SaveOutcome,
}

/// Owns one engine and one snapshot store for a single user's attempt.
///
/// Replaces the global engine/timer pair of the original design with an
/// explicitly owned session object: the host constructs one controller,
/// drives it from a single logical thread (one tick interval plus one UI
/// event stream), re-renders from its state after every call, and stops
/// ticking once the session is finished.
pub struct SessionController {
    engine: QuizEngine,
    snapshots: Arc<dyn SnapshotStore>,
    storage_key: String,
    clock: Clock,
}

impl SessionController {
    /// Starts a session under the default storage key.
    pub async fn start(bank: &QuestionBank, snapshots: Arc<dyn SnapshotStore>, clock: Clock) -> Self {
        Self::start_with_key(bank, snapshots, clock, DEFAULT_STORAGE_KEY).await
    }

    /// Starts a session, resuming from a persisted snapshot when one is
    /// present and compatible.
    ///
    /// Missing, unreadable, or incompatible snapshots (corrupt payload,
    /// title mismatch) are discarded with a log line and a fresh session
    /// takes their place; starting never fails.
    pub async fn start_with_key(
        bank: &QuestionBank,
        snapshots: Arc<dyn SnapshotStore>,
        clock: Clock,
        storage_key: &str,
    ) -> Self {
        let engine = match snapshots.load(storage_key).await {
            Ok(Some(snapshot)) => match snapshot.restore(bank) {
                Ok(engine) => engine,
                Err(err) => {
                    log::debug!("discarding incompatible snapshot: {err}");
                    QuizEngine::new(bank, clock.now())
                }
            },
            Ok(None) => QuizEngine::new(bank, clock.now()),
            Err(err) => {
                log::debug!("discarding unreadable snapshot: {err}");
                QuizEngine::new(bank, clock.now())
            }
        };

        Self {
            engine,
            snapshots,
            storage_key: storage_key.to_owned(),
            clock,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Current render state for the host.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_engine(&self.engine)
    }

    /// Advances the countdown by one second and writes the session back.
    ///
    /// The host calls this once per wall-clock second and stops its
    /// interval when the returned outcome reports a finished session.
    pub async fn tick(&mut self) -> TickOutcome {
        self.engine.tick();
        let saved = self.persist().await;
        TickOutcome {
            remaining_secs: self.engine.remaining_secs(),
            is_finished: self.engine.is_finished(),
            saved,
        }
    }

    /// Records an answer for the current question and writes back.
    pub async fn select_answer(&mut self, option_index: usize) -> SaveOutcome {
        self.engine.select_answer(option_index);
        self.persist().await
    }

    /// Jumps to a question (tolerant of out-of-range indexes) and writes
    /// back.
    pub async fn go_to(&mut self, index: usize) -> SaveOutcome {
        self.engine.go_to(index);
        self.persist().await
    }

    /// Moves forward past an answered question and writes back.
    pub async fn advance(&mut self) -> SaveOutcome {
        self.engine.advance();
        self.persist().await
    }

    /// Moves back one question and writes back.
    pub async fn retreat(&mut self) -> SaveOutcome {
        self.engine.retreat();
        self.persist().await
    }

    /// Finalizes the session and writes back; idempotent like the engine.
    pub async fn finish(&mut self) -> (QuizSummary, SaveOutcome) {
        let summary = self.engine.finish().clone();
        let saved = self.persist().await;
        (summary, saved)
    }

    /// Discards the persisted snapshot and starts over with a fresh
    /// session for the same or a newly loaded bank.
    pub async fn restart(&mut self, bank: &QuestionBank) {
        if let Err(err) = self.snapshots.clear(&self.storage_key).await {
            log::warn!("failed to clear session snapshot: {err}");
        }
        self.engine = QuizEngine::new(bank, self.clock.now());
    }

    async fn persist(&self) -> SaveOutcome {
        match self
            .snapshots
            .save(&self.storage_key, &self.engine.snapshot())
            .await
        {
            Ok(()) => SaveOutcome::Persisted,
            Err(err) => {
                log::warn!("failed to persist session snapshot: {err}");
                SaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::time::{fixed_clock, fixed_now};
    use quiz_core::{QuizEngine, SessionSnapshot};
    use storage::StorageError;
    use storage::repository::InMemorySnapshotStore;

    fn build_bank(title: &str) -> QuestionBank {
        crate::bank_loader::load_bank_from_str(&format!(
            r#"{{
                "title": "{title}",
                "timeLimitSec": 10,
                "passThreshold": 0.5,
                "questions": [
                    {{"id": "q1", "text": "one?", "options": ["a", "b"], "correctIndex": 0}},
                    {{"id": "q2", "text": "two?", "options": ["x", "y"], "correctIndex": 1}}
                ]
            }}"#
        ))
        .unwrap()
    }

    /// Store whose writes always fail, for the log-and-continue policy.
    struct FailingStore;

    #[async_trait]
    impl SnapshotStore for FailingStore {
        async fn save(&self, _key: &str, _s: &SessionSnapshot) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn load(&self, _key: &str) -> Result<Option<SessionSnapshot>, StorageError> {
            Ok(None)
        }

        async fn clear(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    #[tokio::test]
    async fn fresh_start_when_store_is_empty() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        let controller = SessionController::start(&bank, store, fixed_clock()).await;

        assert_eq!(controller.engine().len(), 2);
        assert_eq!(controller.engine().remaining_secs(), 10);
        assert!(!controller.engine().is_finished());
    }

    #[tokio::test]
    async fn every_mutation_persists_the_session() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut controller =
            SessionController::start(&bank, Arc::clone(&store) as _, fixed_clock()).await;

        let saved = controller.select_answer(1).await;
        assert!(saved.is_persisted());

        let persisted = store.load(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(persisted.answers.len(), 1);

        let _ = controller.tick().await;
        let persisted = store.load(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(persisted.remaining_secs, Some(9));
    }

    #[tokio::test]
    async fn resume_reproduces_mid_session_state() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());

        let (index, answers, remaining) = {
            let mut controller =
                SessionController::start(&bank, Arc::clone(&store) as _, fixed_clock()).await;
            let _ = controller.select_answer(1).await;
            let _ = controller.advance().await;
            let _ = controller.tick().await;
            let engine = controller.engine();
            (
                engine.current_index(),
                engine.answers().clone(),
                engine.remaining_secs(),
            )
        };

        let resumed = SessionController::start(&bank, store as _, fixed_clock()).await;
        assert_eq!(resumed.engine().current_index(), index);
        assert_eq!(resumed.engine().answers(), &answers);
        assert_eq!(resumed.engine().remaining_secs(), remaining);
    }

    #[tokio::test]
    async fn corrupt_snapshot_falls_back_to_fresh() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        store.put_raw(DEFAULT_STORAGE_KEY, "{ garbage").unwrap();

        let controller =
            SessionController::start(&bank, Arc::clone(&store) as _, fixed_clock()).await;
        assert_eq!(controller.engine().remaining_secs(), 10);
        assert_eq!(controller.engine().answered_count(), 0);
    }

    #[tokio::test]
    async fn stale_snapshot_title_falls_back_to_fresh() {
        let other = build_bank("Old Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        let snapshot = QuizEngine::with_seed(&other, 1, fixed_now()).snapshot();
        store.save(DEFAULT_STORAGE_KEY, &snapshot).await.unwrap();

        let bank = build_bank("New Quiz");
        let controller =
            SessionController::start(&bank, Arc::clone(&store) as _, fixed_clock()).await;
        assert_eq!(controller.engine().title(), "New Quiz");
        assert_eq!(controller.engine().answered_count(), 0);
    }

    #[tokio::test]
    async fn failed_saves_never_abort_the_action() {
        let bank = build_bank("Quiz");
        let mut controller =
            SessionController::start(&bank, Arc::new(FailingStore), fixed_clock()).await;

        let saved = controller.select_answer(0).await;
        assert!(!saved.is_persisted());
        assert_eq!(controller.engine().selected_answer(), Some(0));

        let outcome = controller.tick().await;
        assert_eq!(outcome.saved, SaveOutcome::Failed);
        assert_eq!(outcome.remaining_secs, 9);

        // Restart proceeds even when the clear fails.
        controller.restart(&bank).await;
        assert_eq!(controller.engine().remaining_secs(), 10);
    }

    #[tokio::test]
    async fn restart_clears_the_store_and_resets_the_engine() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut controller =
            SessionController::start(&bank, Arc::clone(&store) as _, fixed_clock()).await;

        let _ = controller.select_answer(1).await;
        controller.restart(&bank).await;

        assert_eq!(store.load(DEFAULT_STORAGE_KEY).await.unwrap(), None);
        assert_eq!(controller.engine().answered_count(), 0);
        assert!(!controller.engine().is_finished());
    }

    #[tokio::test]
    async fn tick_reports_completion_so_the_host_can_stop_its_interval() {
        let bank = build_bank("Quiz");
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut controller = SessionController::start(&bank, store, fixed_clock()).await;

        let mut last = controller.tick().await;
        let mut ticks = 1;
        while !last.is_finished {
            last = controller.tick().await;
            ticks += 1;
        }

        assert_eq!(ticks, 10);
        assert_eq!(last.remaining_secs, 0);
        assert!(controller.engine().is_finished());
    }
}
