//! Loads and validates raw question banks.
//!
//! Bank loading happens once, before any session exists; the engine only
//! ever sees a validated `QuestionBank`.

use std::fs;
use std::path::Path;

use quiz_core::{BankDraft, QuestionBank};

use crate::error::BankLoadError;

/// Parses and validates a bank from its JSON text.
///
/// # Errors
///
/// Returns `BankLoadError::Parse` for malformed JSON and
/// `BankLoadError::Invalid` when the parsed bank fails validation (empty
/// question list, duplicate ids, malformed questions).
pub fn load_bank_from_str(json: &str) -> Result<QuestionBank, BankLoadError> {
    let draft: BankDraft = serde_json::from_str(json)?;
    Ok(draft.validate()?)
}

/// Reads, parses, and validates a bank file.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read, otherwise as
/// [`load_bank_from_str`].
pub fn load_bank_from_path(path: impl AsRef<Path>) -> Result<QuestionBank, BankLoadError> {
    let raw = fs::read_to_string(path)?;
    load_bank_from_str(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::BankError;

    const VALID_BANK: &str = r#"{
        "title": "Basics",
        "timeLimitSec": 60,
        "passThreshold": 0.5,
        "questions": [
            {"id": "q1", "text": "one?", "options": ["a", "b"], "correctIndex": 0},
            {"id": "q2", "text": "two?", "options": ["x", "y", "z"], "correctIndex": 2, "topic": "t"}
        ]
    }"#;

    #[test]
    fn loads_a_valid_bank() {
        let bank = load_bank_from_str(VALID_BANK).unwrap();
        assert_eq!(bank.title(), "Basics");
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.time_limit_secs(), 60);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = load_bank_from_str("{ nope").unwrap_err();
        assert!(matches!(err, BankLoadError::Parse(_)));
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = load_bank_from_str(r#"{"title": "Empty", "questions": []}"#).unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Invalid(BankError::NoQuestions)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_bank_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, BankLoadError::Io(_)));
    }
}
