mod bank;
mod ids;
mod question;
mod summary;

pub use bank::{
    BankDraft, BankError, QuestionBank, QuestionDraft, SessionConfig, DEFAULT_PASS_THRESHOLD,
    DEFAULT_TIME_LIMIT_SECS,
};
pub use ids::QuestionId;
pub use question::{Question, QuestionError};
pub use summary::{QuizSummary, TopicScore, UNLABELED_TOPIC};
