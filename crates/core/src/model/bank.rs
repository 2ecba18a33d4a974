use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};

/// Time limit applied when the bank omits one or supplies zero.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Pass threshold applied when the bank omits one or supplies a value
/// outside (0, 1].
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.7;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("bank title cannot be empty")]
    EmptyTitle,

    #[error("bank contains no questions")]
    NoQuestions,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Session-wide configuration carried by a bank.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    title: String,
    time_limit_secs: u32,
    pass_threshold: f64,
}

impl SessionConfig {
    /// Creates a config, falling back to defaults for an absent or invalid
    /// time limit (zero) or pass threshold (outside (0, 1]).
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(
        title: impl Into<String>,
        time_limit_secs: Option<u32>,
        pass_threshold: Option<f64>,
    ) -> Result<Self, BankError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(BankError::EmptyTitle);
        }

        let time_limit_secs = match time_limit_secs {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_TIME_LIMIT_SECS,
        };
        let pass_threshold = match pass_threshold {
            Some(t) if t.is_finite() && t > 0.0 && t <= 1.0 => t,
            _ => DEFAULT_PASS_THRESHOLD,
        };

        Ok(Self {
            title: title.trim().to_owned(),
            time_limit_secs,
            pass_threshold,
        })
    }

    // Accessors
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn pass_threshold(&self) -> f64 {
        self.pass_threshold
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// The static set of questions and configuration loaded once per run.
///
/// Construction is the only validation gate the engine relies on: a
/// `QuestionBank` always holds at least one question and duplicate-free
/// ids, so downstream code never re-checks either.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    config: SessionConfig,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a validated bank in canonical question order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::NoQuestions` for an empty question list and
    /// `BankError::DuplicateQuestionId` when two questions share an id.
    pub fn new(config: SessionConfig, questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::NoQuestions);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id().clone()) {
                return Err(BankError::DuplicateQuestionId(
                    question.id().as_str().to_owned(),
                ));
            }
        }

        Ok(Self { config, questions })
    }

    // Accessors
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.config.title()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.config.time_limit_secs()
    }

    #[must_use]
    pub fn pass_threshold(&self) -> f64 {
        self.config.pass_threshold()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question_by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Raw question shape as found in a bank file, prior to validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub topic: Option<String>,
}

impl QuestionDraft {
    /// Validates the draft into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for any field that fails validation.
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(self.id, self.text, self.options, self.correct_index, self.topic)
    }
}

/// Raw bank shape as found in a bank file, prior to validation.
///
/// Wire names (`timeLimitSec`, `passThreshold`, `correctIndex`) follow the
/// persisted JSON bank format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDraft {
    pub title: String,
    #[serde(default, rename = "timeLimitSec")]
    pub time_limit_secs: Option<u32>,
    #[serde(default)]
    pub pass_threshold: Option<f64>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

impl BankDraft {
    /// Validates the draft into a domain `QuestionBank`.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the title is empty, the question list is
    /// empty, ids collide, or any question fails validation.
    pub fn validate(self) -> Result<QuestionBank, BankError> {
        let config = SessionConfig::new(self.title, self.time_limit_secs, self.pass_threshold)?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        QuestionBank::new(config, questions)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: &str) -> Question {
        Question::new(
            id,
            format!("text for {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            0,
            None,
        )
        .unwrap()
    }

    fn build_config() -> SessionConfig {
        SessionConfig::new("Sample Quiz", Some(60), Some(0.5)).unwrap()
    }

    #[test]
    fn config_rejects_empty_title() {
        let err = SessionConfig::new("  ", Some(60), Some(0.5)).unwrap_err();
        assert_eq!(err, BankError::EmptyTitle);
    }

    #[test]
    fn config_applies_defaults_for_invalid_values() {
        let config = SessionConfig::new("Quiz", None, None).unwrap();
        assert_eq!(config.time_limit_secs(), DEFAULT_TIME_LIMIT_SECS);
        assert!((config.pass_threshold() - DEFAULT_PASS_THRESHOLD).abs() < f64::EPSILON);

        let config = SessionConfig::new("Quiz", Some(0), Some(1.5)).unwrap();
        assert_eq!(config.time_limit_secs(), DEFAULT_TIME_LIMIT_SECS);
        assert!((config.pass_threshold() - DEFAULT_PASS_THRESHOLD).abs() < f64::EPSILON);

        let config = SessionConfig::new("Quiz", Some(0), Some(f64::NAN)).unwrap();
        assert!((config.pass_threshold() - DEFAULT_PASS_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn bank_rejects_empty_question_list() {
        let err = QuestionBank::new(build_config(), Vec::new()).unwrap_err();
        assert_eq!(err, BankError::NoQuestions);
    }

    #[test]
    fn bank_rejects_duplicate_ids() {
        let err = QuestionBank::new(
            build_config(),
            vec![build_question("q1"), build_question("q1")],
        )
        .unwrap_err();
        assert_eq!(err, BankError::DuplicateQuestionId("q1".into()));
    }

    #[test]
    fn bank_happy_path() {
        let bank = QuestionBank::new(
            build_config(),
            vec![build_question("q1"), build_question("q2")],
        )
        .unwrap();

        assert_eq!(bank.len(), 2);
        assert!(!bank.is_empty());
        assert_eq!(bank.title(), "Sample Quiz");
        assert!(bank.question_by_id(&QuestionId::from("q2")).is_some());
        assert!(bank.question_by_id(&QuestionId::from("q3")).is_none());
    }

    #[test]
    fn draft_parses_wire_format_and_validates() {
        let json = r#"{
            "title": "Rust Basics",
            "timeLimitSec": 120,
            "passThreshold": 0.6,
            "questions": [
                {
                    "id": "q1",
                    "text": "What does ownership prevent?",
                    "options": ["data races", "typos"],
                    "correctIndex": 0,
                    "topic": "memory"
                },
                {
                    "id": "q2",
                    "text": "What is a slice?",
                    "options": ["a view", "a copy", "a clone"],
                    "correctIndex": 0
                }
            ]
        }"#;

        let draft: BankDraft = serde_json::from_str(json).unwrap();
        let bank = draft.validate().unwrap();

        assert_eq!(bank.title(), "Rust Basics");
        assert_eq!(bank.time_limit_secs(), 120);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].topic(), Some("memory"));
        assert_eq!(bank.questions()[1].topic(), None);
    }

    #[test]
    fn draft_validate_surfaces_question_errors() {
        let draft = BankDraft {
            title: "Quiz".into(),
            time_limit_secs: None,
            pass_threshold: None,
            questions: vec![QuestionDraft {
                id: "q1".into(),
                text: "pick".into(),
                options: vec!["only one".into()],
                correct_index: 0,
                topic: None,
            }],
        };

        let err = draft.validate().unwrap_err();
        assert_eq!(err, BankError::Question(QuestionError::TooFewOptions { found: 1 }));
    }
}
