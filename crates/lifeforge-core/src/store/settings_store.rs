use chrono::Utc;
use rusqlite::OptionalExtension;
use std::collections::HashMap;

use crate::db::Database;
use crate::error::ServerError;

/// Key/value user settings. Values are stored as JSON text.
pub struct SettingsStore {
    db: Database,
}

const MODULE_ENABLED_PREFIX: &str = "modules.enabled.";

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, ServerError> {
        let key = key.to_string();
        let raw: Option<String> = self
            .db
            .with_conn_async(move |conn| {
                conn.query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    rusqlite::params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    pub async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), ServerError> {
        let key = key.to_string();
        let value = value.to_string();
        let now = Utc::now().timestamp_millis();
        self.db
            .with_conn_async(move |conn| {
                conn.execute(
                    "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                       value = excluded.value,
                       updated_at = excluded.updated_at",
                    rusqlite::params![key, value, now],
                )?;
                Ok(())
            })
            .await
    }

    /// Persisted enable flag for a module, `None` when never toggled.
    pub async fn module_enabled(&self, name: &str) -> Result<Option<bool>, ServerError> {
        let value = self.get(&format!("{}{}", MODULE_ENABLED_PREFIX, name)).await?;
        Ok(value.and_then(|v| v.as_bool()))
    }

    pub async fn set_module_enabled(&self, name: &str, enabled: bool) -> Result<(), ServerError> {
        self.set(
            &format!("{}{}", MODULE_ENABLED_PREFIX, name),
            &serde_json::Value::Bool(enabled),
        )
        .await
    }

    /// All persisted module flags, keyed by module name.
    pub async fn module_flags(&self) -> Result<HashMap<String, bool>, ServerError> {
        let pattern = format!("{}%", MODULE_ENABLED_PREFIX);
        let rows: Vec<(String, String)> = self
            .db
            .with_conn_async(move |conn| {
                let mut stmt = conn.prepare("SELECT key, value FROM settings WHERE key LIKE ?1")?;
                let rows = stmt
                    .query_map(rusqlite::params![pattern], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(MODULE_ENABLED_PREFIX)?.to_string();
                let enabled = serde_json::from_str::<bool>(&value).ok()?;
                Some((name, enabled))
            })
            .collect())
    }
}
