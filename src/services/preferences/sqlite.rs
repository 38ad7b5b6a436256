use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::PreferenceStore;
use crate::services::database::Database;

/// Preference store persisted in the `preferences` table.
pub struct SqlitePreferenceStore<'a> {
    db: &'a Database,
}

impl<'a> SqlitePreferenceStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl PreferenceStore for SqlitePreferenceStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read preference '{}'", key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO preferences (key, value, updated_at)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP",
                params![key, value],
            )
            .with_context(|| format!("Failed to write preference '{}'", key))?;
        Ok(())
    }
}
