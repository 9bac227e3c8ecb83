//! SQLite-backed durable store.
//!
//! # Invariants
//! - All access goes through the `kv_entries` table checked by `db::schema`.
//! - Saving an existing key overwrites it in place.

use crate::db::{open_db, open_db_in_memory};
use crate::persist::{DurableResult, DurableStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// [`DurableStore`] persisted in one SQLite database; the file is the origin.
pub struct SqliteDurableStore {
    conn: Connection,
}

impl SqliteDurableStore {
    /// Opens (or creates) the snapshot database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DurableResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DurableResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Stored keys in ascending order.
    pub fn keys(&self) -> DurableResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }
}

impl DurableStore for SqliteDurableStore {
    fn load(&self, key: &str) -> DurableResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> DurableResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DurableResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
