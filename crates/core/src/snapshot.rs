use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::engine::QuizEngine;
use crate::model::{Question, QuestionBank, QuestionId};
use crate::shuffle::is_permutation;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The snapshot belongs to a different bank; callers fall back to a
    /// fresh session.
    #[error("snapshot title {found:?} does not match bank title {expected:?}")]
    TitleMismatch { expected: String, found: String },
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Serializable projection of a session, used for persistence and
/// restoration.
///
/// A flat record that round-trips through JSON; the persistence boundary is
/// string-oriented. Wire names (`timeLimitSec`, `remainingSec`,
/// `perQuestionSec`) follow the previously persisted format, and most
/// fields default when absent so older or partial payloads still restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub title: String,
    #[serde(rename = "timeLimitSec")]
    pub time_limit_secs: u32,
    pub pass_threshold: f64,
    pub question_order: Vec<QuestionId>,
    #[serde(default)]
    pub option_orders: HashMap<QuestionId, Vec<usize>>,
    #[serde(default, deserialize_with = "lenient_index")]
    pub current_index: usize,
    #[serde(default)]
    pub answers: HashMap<QuestionId, usize>,
    #[serde(default, rename = "remainingSec", deserialize_with = "lenient_secs")]
    pub remaining_secs: Option<u32>,
    #[serde(default, rename = "perQuestionSec")]
    pub per_question_secs: HashMap<QuestionId, u32>,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub seed: u64,
    pub started_at: DateTime<Utc>,
}

/// Accepts negative `remainingSec` values from older payloads; they coerce
/// to absent, which restore treats as a full timer. One bad field must not
/// discard an otherwise usable snapshot.
fn lenient_secs<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|secs| u32::try_from(secs).ok()))
}

/// Accepts a negative `currentIndex` by flooring it at the first question;
/// restore reclamps the upper bound against the surviving length.
fn lenient_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(usize::try_from(raw).unwrap_or(0))
}

impl SessionSnapshot {
    /// Pure projection of an engine's observable state.
    #[must_use]
    pub fn capture(engine: &QuizEngine) -> Self {
        Self {
            title: engine.title().to_owned(),
            time_limit_secs: engine.time_limit_secs(),
            pass_threshold: engine.pass_threshold(),
            question_order: engine.questions().iter().map(|q| q.id().clone()).collect(),
            option_orders: engine.option_orders().clone(),
            current_index: engine.current_index(),
            answers: engine.answers().clone(),
            remaining_secs: Some(engine.remaining_secs()),
            per_question_secs: engine.per_question_secs().clone(),
            is_finished: engine.is_finished(),
            seed: engine.seed(),
            started_at: engine.started_at(),
        }
    }

    /// Reconstructs an engine from this snapshot against the current bank.
    ///
    /// Questions are rebuilt strictly in the snapshot's order; ids no
    /// longer present in the bank are dropped silently (partial bank drift
    /// is tolerated), and if nothing survives the bank's canonical order is
    /// used. Option orders apply only when they are valid permutations,
    /// otherwise display order falls back to the canonical one. The current
    /// index is reclamped into the possibly shorter bounds, answer and
    /// timing maps are retained only for surviving ids, and a negative or
    /// absent remaining time coerces to the bank's time limit.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::TitleMismatch` when the snapshot was taken
    /// for a different bank title.
    pub fn restore(&self, bank: &QuestionBank) -> Result<QuizEngine, SnapshotError> {
        if self.title != bank.title() {
            return Err(SnapshotError::TitleMismatch {
                expected: bank.title().to_owned(),
                found: self.title.clone(),
            });
        }

        let by_id: HashMap<&QuestionId, &Question> =
            bank.questions().iter().map(|q| (q.id(), q)).collect();
        let mut surviving: Vec<&Question> = self
            .question_order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        if surviving.is_empty() {
            surviving = bank.questions().iter().collect();
        }

        let mut questions = Vec::with_capacity(surviving.len());
        let mut option_orders = HashMap::with_capacity(surviving.len());
        for question in surviving {
            let order = self
                .option_orders
                .get(question.id())
                .filter(|order| is_permutation(order, question.option_count()))
                .cloned()
                .unwrap_or_else(|| (0..question.option_count()).collect());
            questions.push(question.reordered(&order));
            option_orders.insert(question.id().clone(), order);
        }

        let ids: HashSet<&QuestionId> = questions.iter().map(Question::id).collect();
        let mut answers = self.answers.clone();
        answers.retain(|id, _| ids.contains(id));
        let mut per_question_secs = self.per_question_secs.clone();
        per_question_secs.retain(|id, _| ids.contains(id));

        // The bank is non-empty by construction, so len >= 1 here.
        let current = self.current_index.min(questions.len().saturating_sub(1));
        let remaining_secs = self.remaining_secs.unwrap_or(bank.time_limit_secs());

        Ok(QuizEngine::from_restored(
            bank.config().clone(),
            questions,
            option_orders,
            current,
            answers,
            remaining_secs,
            per_question_secs,
            self.is_finished,
            self.seed,
            self.started_at,
        ))
    }
}

impl QuizEngine {
    /// Convenience alias for [`SessionSnapshot::capture`].
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
