//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::BankError;

/// Errors emitted while loading a question bank.
///
/// Persistence failures have no error type here on purpose: the controller
/// models them as a [`crate::session::SaveOutcome`] and never lets them
/// abort a user action.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read bank file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse bank JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] BankError),
}
