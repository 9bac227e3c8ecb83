//! `kv_entries` schema for durable snapshots.
//!
//! # Invariants
//! - `PRAGMA user_version` equals [`SCHEMA_VERSION`] once the table exists.
//! - A file stamped with a newer version is refused, never downgraded.
//! - A current stamp without the table (hand-edited file) gets the table
//!   recreated empty.

use crate::persist::{DurableError, DurableResult};
use rusqlite::Connection;

/// Version stamp written after `kv_entries` is created.
pub const SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Creates `kv_entries` when missing and stamps the schema version.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn ensure_schema(conn: &mut Connection) -> DurableResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DurableError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION && has_kv_entries(conn)? {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_ENTRIES_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Current `PRAGMA user_version`; 0 for a fresh file.
pub fn schema_version(conn: &Connection) -> DurableResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

pub fn has_kv_entries(conn: &Connection) -> DurableResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
        );",
        [],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
