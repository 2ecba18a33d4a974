#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemorySnapshotStore, SnapshotStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
