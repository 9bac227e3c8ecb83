//! Core engine for a shared cost calculator.
//!
//! Owns the roster of people and the expense ledger, keeps both in sync with
//! durable storage and a shareable link, and derives per-person totals and
//! equal splits on demand.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;
pub mod sync;

pub use aggregate::{column_total, column_totals, edit_draft, equal_split, round_cents};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::expense::{Amount, Expense, ExpenseDraft, ExpenseValidationError};
pub use model::person::{Person, PersonValidationError};
pub use persist::{
    Collection, DurableError, DurableStore, LinkError, MemoryDurableStore, ShareLink,
    SqliteDurableStore, UrlShareLink, EXPENSES_KEY, PEOPLE_KEY,
};
pub use store::{LedgerStore, Revision, RosterStore, StoreError, StoreResult};
pub use sync::{
    BootstrapReport, CollectionLoad, CommitEvent, SnapshotSource, SyncController, SyncPhase,
    WriteOutcome,
};
