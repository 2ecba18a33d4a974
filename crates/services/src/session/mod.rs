mod controller;
mod view;

// Public API of the session subsystem.
pub use controller::{DEFAULT_STORAGE_KEY, SaveOutcome, SessionController, TickOutcome};
pub use view::{QuestionView, ReviewItem, SessionView, format_remaining, review_items};
