#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod shuffle;
pub mod snapshot;
pub mod time;

pub use engine::QuizEngine;
pub use error::Error;
pub use model::{
    BankDraft, BankError, Question, QuestionBank, QuestionDraft, QuestionError, QuestionId,
    QuizSummary, SessionConfig, TopicScore,
};
pub use snapshot::{SessionSnapshot, SnapshotError};
pub use time::Clock;
