use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::shuffle::is_permutation;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least two options, got {found}")]
    TooFewOptions { found: usize },

    #[error("correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Immutable value: once constructed, text, options, and the correct index
/// never change. The engine keeps questions in display space, so
/// `correct_index` always refers to the option order the value currently
/// carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    topic: Option<String>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is empty or
    /// whitespace-only, fewer than two options are given, or
    /// `correct_index` does not address an option.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        topic: Option<String>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }

        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                found: options.len(),
            });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            });
        }

        let topic = topic
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());

        Ok(Self {
            id: QuestionId::new(id),
            text,
            options,
            correct_index,
            topic,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Returns a copy of this question permuted into display space.
    ///
    /// `order` maps display position to the original option index;
    /// `correct_index` is remapped into the same display order so answers,
    /// scoring, and rendering all share one coordinate space. An `order`
    /// that is not a permutation of the option indexes leaves the question
    /// unchanged.
    #[must_use]
    pub fn reordered(&self, order: &[usize]) -> Self {
        if !is_permutation(order, self.options.len()) {
            return self.clone();
        }
        let options = order.iter().map(|&i| self.options[i].clone()).collect();
        let correct_index = order
            .iter()
            .position(|&i| i == self.correct_index)
            .unwrap_or(self.correct_index);

        Self {
            id: self.id.clone(),
            text: self.text.clone(),
            options,
            correct_index,
            topic: self.topic.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("opt {i}")).collect()
    }

    #[test]
    fn new_rejects_empty_id_and_text() {
        let err = Question::new("   ", "2+2?", options(3), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyId);

        let err = Question::new("q1", "  ", options(3), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn new_rejects_too_few_options() {
        let err = Question::new("q1", "2+2?", options(1), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { found: 1 });
    }

    #[test]
    fn new_rejects_out_of_range_correct_index() {
        let err = Question::new("q1", "2+2?", options(3), 3, None).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectIndexOutOfRange {
                index: 3,
                options: 3
            }
        );
    }

    #[test]
    fn new_filters_blank_topic() {
        let q = Question::new("q1", "2+2?", options(2), 1, Some("   ".into())).unwrap();
        assert_eq!(q.topic(), None);

        let q = Question::new("q1", "2+2?", options(2), 1, Some(" math ".into())).unwrap();
        assert_eq!(q.topic(), Some("math"));
    }

    #[test]
    fn reordered_permutes_options_and_remaps_correct_index() {
        let q = Question::new("q1", "pick", options(3), 1, None).unwrap();
        let display = q.reordered(&[2, 0, 1]);

        assert_eq!(display.options(), ["opt 2", "opt 0", "opt 1"]);
        // Original option 1 now sits at display position 2.
        assert_eq!(display.correct_index(), 2);
        assert_eq!(display.options()[display.correct_index()], "opt 1");
    }

    #[test]
    fn reordered_ignores_malformed_order() {
        let q = Question::new("q1", "pick", options(3), 1, None).unwrap();
        assert_eq!(q.reordered(&[0, 0, 1]), q);
        assert_eq!(q.reordered(&[0, 1]), q);
    }
}
