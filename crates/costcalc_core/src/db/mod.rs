//! SQLite backing for the durable snapshot channel.
//!
//! `open` hands out configured connections; `schema` owns the single
//! `kv_entries` table and its version stamp.

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_schema, has_kv_entries, schema_version, SCHEMA_VERSION};
