use chrono::Utc;
use sqlx::Row;

use quiz_core::SessionSnapshot;

use super::SqliteStore;
use crate::repository::{SnapshotStore, StorageError, decode_snapshot, encode_snapshot};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl SnapshotStore for SqliteStore {
    async fn save(&self, key: &str, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let payload = encode_snapshot(snapshot)?;

        sqlx::query(
            r"
                INSERT INTO snapshots (key, payload, saved_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    payload = excluded.payload,
                    saved_at = excluded.saved_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM snapshots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(conn)?;
        decode_snapshot(&payload).map(Some)
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM snapshots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
