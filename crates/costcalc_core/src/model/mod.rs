//! Domain model for the roster and the expense ledger.
//!
//! # Responsibility
//! - Define the records owned by the roster and ledger stores.
//! - Provide validation entry points used before any store commit.
//!
//! # Invariants
//! - Person names are unique within a roster (case-sensitive).
//! - Expense identity (`name`) is kept apart from its per-person amounts.

pub mod expense;
pub mod person;
