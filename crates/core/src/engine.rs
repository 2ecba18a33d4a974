use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::{Question, QuestionBank, QuestionId, QuizSummary, SessionConfig};
use crate::shuffle::{self, OrderShuffler};

/// State machine for one quiz attempt.
///
/// Owns question ordering, the answer map, the countdown, per-question
/// timing, completion, and scoring. The engine has no time source and no
/// persistence; the host drives it via navigation/selection/tick calls and
/// snapshots it after every mutation.
///
/// Questions are held in display space: both the question sequence and each
/// question's options are already permuted, with `correct_index` remapped
/// at shuffle time. Answers are keyed by question id and store the selected
/// display-space option index, so select, score, snapshot, and render all
/// share one coordinate space.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    config: SessionConfig,
    questions: Vec<Question>,
    option_orders: HashMap<QuestionId, Vec<usize>>,
    current: usize,
    answers: HashMap<QuestionId, usize>,
    remaining_secs: u32,
    per_question_secs: HashMap<QuestionId, u32>,
    finished: bool,
    summary_cache: Option<QuizSummary>,
    seed: u64,
    started_at: DateTime<Utc>,
}

impl QuizEngine {
    /// Creates a fresh session with a random shuffle seed.
    ///
    /// `started_at` should come from the host clock. Empty banks are
    /// unconstructible (`QuestionBank` validation rejects them), so the
    /// engine always holds at least one question.
    #[must_use]
    pub fn new(bank: &QuestionBank, started_at: DateTime<Utc>) -> Self {
        Self::with_seed(bank, shuffle::random_seed(), started_at)
    }

    /// Creates a session with a deterministic shuffle seed.
    ///
    /// The question order is drawn first, then each question's option order
    /// in display-question order, all from one seeded stream; the same seed
    /// therefore reproduces identical orders.
    #[must_use]
    pub fn with_seed(bank: &QuestionBank, seed: u64, started_at: DateTime<Utc>) -> Self {
        let mut shuffler = OrderShuffler::new(seed);
        let question_order = shuffler.order(bank.len());

        let mut questions = Vec::with_capacity(bank.len());
        let mut option_orders = HashMap::with_capacity(bank.len());
        for &index in &question_order {
            let question = &bank.questions()[index];
            let order = shuffler.order(question.option_count());
            questions.push(question.reordered(&order));
            option_orders.insert(question.id().clone(), order);
        }

        Self {
            config: bank.config().clone(),
            questions,
            option_orders,
            current: 0,
            answers: HashMap::new(),
            remaining_secs: bank.time_limit_secs(),
            per_question_secs: HashMap::new(),
            finished: false,
            summary_cache: None,
            seed,
            started_at,
        }
    }

    /// Rebuilds an engine from snapshot-derived parts.
    ///
    /// `questions` must already be in display space with matching
    /// `option_orders`; the snapshot codec is the only caller. A finished
    /// session gets its summary cache recomputed eagerly so `finish()`
    /// stays idempotent after a restore.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_restored(
        config: SessionConfig,
        questions: Vec<Question>,
        option_orders: HashMap<QuestionId, Vec<usize>>,
        current: usize,
        answers: HashMap<QuestionId, usize>,
        remaining_secs: u32,
        per_question_secs: HashMap<QuestionId, u32>,
        finished: bool,
        seed: u64,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut engine = Self {
            config,
            questions,
            option_orders,
            current,
            answers,
            remaining_secs,
            per_question_secs,
            finished,
            summary_cache: None,
            seed,
            started_at,
        };
        if engine.finished {
            engine.summary_cache = Some(engine.compute_summary());
        }
        engine
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Jumps to `index` if it is in range; out-of-range indexes are a
    /// silent no-op (tolerant navigation, also used for post-finish review).
    pub fn go_to(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current = index;
        }
    }

    /// Moves one question forward, but only once the current question has a
    /// recorded answer. The must-answer-before-proceeding gate is a policy
    /// no-op, not an error.
    pub fn advance(&mut self) {
        if self.selected_answer().is_some() {
            self.go_to(self.current + 1);
        }
    }

    /// Moves one question back; always allowed except at the start.
    pub fn retreat(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    //
    // ─── ANSWERING & TIMING ────────────────────────────────────────────────────
    //

    /// Records `option_index` for the current question; no-op once
    /// finished.
    ///
    /// The index is display-relative and deliberately not range-validated:
    /// the engine trusts the rendered option set, and the value is simply
    /// never correct if a caller stores one out of range.
    pub fn select_answer(&mut self, option_index: usize) {
        if self.finished {
            return;
        }
        if let Some(question) = self.questions.get(self.current) {
            self.answers.insert(question.id().clone(), option_index);
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Decrements the remaining time (floored at zero), accrues one second
    /// to the current question, and finishes the session when the timer
    /// runs out. No-op once finished. The host calls this once per
    /// wall-clock second.
    pub fn tick(&mut self) {
        if self.finished {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if let Some(id) = self.questions.get(self.current).map(|q| q.id().clone()) {
            let spent = self.per_question_secs.entry(id).or_insert(0);
            *spent = spent.saturating_add(1);
        }
        if self.remaining_secs == 0 {
            self.finish();
        }
    }

    //
    // ─── COMPLETION & SCORING ──────────────────────────────────────────────────
    //

    /// Finishes the session and returns the summary. Idempotent: the first
    /// call computes and caches the summary; later calls return the cache
    /// with no recomputation and no other state change.
    pub fn finish(&mut self) -> &QuizSummary {
        self.finished = true;
        let summary = match self.summary_cache.take() {
            Some(cached) => cached,
            None => self.compute_summary(),
        };
        self.summary_cache.insert(summary)
    }

    /// Returns the cached summary if finished, otherwise computes one on
    /// demand without finishing the session.
    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        self.summary_cache
            .clone()
            .unwrap_or_else(|| self.compute_summary())
    }

    fn compute_summary(&self) -> QuizSummary {
        QuizSummary::from_results(
            self.config.pass_threshold(),
            self.questions.iter().map(|q| {
                let is_correct = self
                    .answers
                    .get(q.id())
                    .is_some_and(|&selected| selected == q.correct_index());
                (q.topic(), is_correct)
            }),
        )
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn title(&self) -> &str {
        self.config.title()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.config.time_limit_secs()
    }

    #[must_use]
    pub fn pass_threshold(&self) -> f64 {
        self.config.pass_threshold()
    }

    /// Number of questions in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: empty banks never reach the engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current position, in display order.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// All questions in display order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The recorded answer for the current question, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        let question = self.questions.get(self.current)?;
        self.answers.get(question.id()).copied()
    }

    /// The recorded answer for a specific question, if any.
    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<usize> {
        self.answers.get(id).copied()
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds accumulated while the given question was current.
    #[must_use]
    pub fn seconds_spent(&self, id: &QuestionId) -> u32 {
        self.per_question_secs.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn per_question_secs(&self) -> &HashMap<QuestionId, u32> {
        &self.per_question_secs
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The display option order (display position to original index) for a
    /// question, as established at shuffle or restore time.
    #[must_use]
    pub fn option_order(&self, id: &QuestionId) -> Option<&[usize]> {
        self.option_orders.get(id).map(Vec::as_slice)
    }

    #[must_use]
    pub(crate) fn option_orders(&self) -> &HashMap<QuestionId, Vec<usize>> {
        &self.option_orders
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
