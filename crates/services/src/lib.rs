#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod error;
pub mod session;

pub use quiz_core::Clock;

pub use bank_loader::{load_bank_from_path, load_bank_from_str};
pub use error::BankLoadError;
pub use session::{
    DEFAULT_STORAGE_KEY, QuestionView, ReviewItem, SaveOutcome, SessionController, SessionView,
    TickOutcome,
};
