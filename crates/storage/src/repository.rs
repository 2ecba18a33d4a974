use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::SessionSnapshot;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encodes a snapshot for the string-oriented persistence boundary.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the snapshot cannot be encoded.
pub fn encode_snapshot(snapshot: &SessionSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decodes a persisted payload back into a snapshot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for corrupt payloads; callers
/// treat that the same as an absent snapshot.
pub fn decode_snapshot(payload: &str) -> Result<SessionSnapshot, StorageError> {
    serde_json::from_str(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Key-value contract for persisted session snapshots.
///
/// The transport is a byte/string store; implementations keep the encoded
/// payload opaque and never interpret session state.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist or replace the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save(&self, key: &str, snapshot: &SessionSnapshot) -> Result<(), StorageError>;

    /// Fetch the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for corrupt payloads, or other
    /// storage errors.
    async fn load(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Remove the snapshot stored under `key`; removing an absent key is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal cannot be performed.
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw access to a stored payload, for corruption tests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save(&self, key: &str, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let payload = encode_snapshot(snapshot)?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), payload);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        let payload = {
            let guard = self
                .entries
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.get(key).cloned()
        };
        payload.as_deref().map(decode_snapshot).transpose()
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the snapshot store behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            snapshots: Arc::new(InMemorySnapshotStore::new()),
        }
    }
}
