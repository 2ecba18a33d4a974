//! Presentation-agnostic render state.
//!
//! The host polls these after every driving call instead of reading the
//! engine directly; nothing here mutates the session.

use quiz_core::QuizEngine;

/// Renders a second count as zero-padded `MM:SS`.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The current question, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position within the session order.
    pub number: usize,
    pub total: usize,
    pub text: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Selected option index in display space, if any.
    pub selected: Option<usize>,
    pub answered: bool,
}

/// Everything the host needs to draw one frame of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub title: String,
    pub question: Option<QuestionView>,
    pub remaining: String,
    pub remaining_secs: u32,
    /// Fraction of the session covered, in `0.0..=1.0`. While running it
    /// counts the current question only once answered; after finish it
    /// tracks the review position.
    pub progress: f64,
    pub at_start: bool,
    pub at_end: bool,
    /// Forward navigation requires an answer on the current question.
    pub can_advance: bool,
    /// Finishing requires standing on the last question with it answered.
    pub can_finish: bool,
    pub is_finished: bool,
}

impl SessionView {
    #[must_use]
    pub fn from_engine(engine: &QuizEngine) -> Self {
        let total = engine.len();
        let index = engine.current_index();
        let selected = engine.selected_answer();
        let at_start = index == 0;
        let at_end = index + 1 == total;
        let has_selection = selected.is_some();

        let covered = if engine.is_finished() {
            index + 1
        } else {
            index + usize::from(has_selection)
        };
        let progress = (covered as f64 / total as f64).clamp(0.0, 1.0);

        let question = engine.current_question().map(|q| QuestionView {
            number: index + 1,
            total,
            text: q.text().to_owned(),
            options: q.options().to_vec(),
            selected,
            answered: has_selection,
        });

        Self {
            title: engine.title().to_owned(),
            question,
            remaining: format_remaining(engine.remaining_secs()),
            remaining_secs: engine.remaining_secs(),
            progress,
            at_start,
            at_end,
            can_advance: !engine.is_finished() && !at_end && has_selection,
            can_finish: engine.is_finished() || (at_end && has_selection),
            is_finished: engine.is_finished(),
        }
    }
}

/// Per-question analytics row for the post-finish review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub text: String,
    pub chosen: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
    pub seconds_spent: u32,
}

/// Review rows in session order; unanswered questions count as incorrect.
#[must_use]
pub fn review_items(engine: &QuizEngine) -> Vec<ReviewItem> {
    engine
        .questions()
        .iter()
        .map(|q| {
            let chosen = engine.answer_for(q.id());
            ReviewItem {
                text: q.text().to_owned(),
                chosen,
                correct_index: q.correct_index(),
                is_correct: chosen == Some(q.correct_index()),
                seconds_spent: engine.seconds_spent(q.id()),
            }
        })
        .collect()
}
