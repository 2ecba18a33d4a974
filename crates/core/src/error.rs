//! Crate-level error aggregation.

use thiserror::Error;

use crate::model::{BankError, QuestionError};
use crate::snapshot::SnapshotError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
