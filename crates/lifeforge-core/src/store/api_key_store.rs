use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::Database;
use crate::error::ServerError;
use crate::models::api_key::ApiKeyEntry;

pub struct ApiKeyStore {
    db: Database,
}

impl ApiKeyStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn save(&self, entry: &ApiKeyEntry) -> Result<(), ServerError> {
        let entry = entry.clone();
        self.db
            .with_conn_async(move |conn| {
                conn.execute(
                    "INSERT INTO api_keys (id, name, key, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                       name = excluded.name,
                       key = excluded.key,
                       updated_at = excluded.updated_at",
                    rusqlite::params![
                        entry.id,
                        entry.name,
                        entry.key,
                        entry.created_at.timestamp_millis(),
                        entry.updated_at.timestamp_millis(),
                    ],
                )?;
                Ok(())
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ApiKeyEntry>, ServerError> {
        let id = id.to_string();
        self.db
            .with_conn_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, key, created_at, updated_at FROM api_keys WHERE id = ?1",
                )?;
                stmt.query_row(rusqlite::params![id], |row| Ok(row_to_api_key(row)))
                    .optional()
            })
            .await
    }

    /// Look up only the key material for `id`, ignoring blank values.
    pub async fn get_key(&self, id: &str) -> Result<Option<String>, ServerError> {
        Ok(self
            .get(id)
            .await?
            .map(|entry| entry.key)
            .filter(|key| !key.trim().is_empty()))
    }

    pub async fn list(&self) -> Result<Vec<ApiKeyEntry>, ServerError> {
        self.db
            .with_conn_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, key, created_at, updated_at FROM api_keys ORDER BY id ASC",
                )?;
                let rows = stmt
                    .query_map([], |row| Ok(row_to_api_key(row)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let id = id.to_string();
        self.db
            .with_conn_async(move |conn| {
                let n = conn.execute("DELETE FROM api_keys WHERE id = ?1", rusqlite::params![id])?;
                Ok(n > 0)
            })
            .await
    }
}

use rusqlite::Row;

fn row_to_api_key(row: &Row<'_>) -> ApiKeyEntry {
    let created_ms: i64 = row.get(3).unwrap_or(0);
    let updated_ms: i64 = row.get(4).unwrap_or(0);

    ApiKeyEntry {
        id: row.get(0).unwrap_or_default(),
        name: row.get(1).unwrap_or_default(),
        key: row.get(2).unwrap_or_default(),
        created_at: chrono::DateTime::from_timestamp_millis(created_ms)
            .unwrap_or_else(Utc::now),
        updated_at: chrono::DateTime::from_timestamp_millis(updated_ms)
            .unwrap_or_else(Utc::now),
    }
}
