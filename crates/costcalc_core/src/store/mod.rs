//! In-memory roster and ledger stores.
//!
//! # Responsibility
//! - Own the current roster and ledger collections.
//! - Apply validated mutations with immutable-update discipline.
//!
//! # Invariants
//! - Every committed mutation swaps in a new collection `Arc` and bumps the
//!   store revision; existing collections are never edited in place.
//! - A rejected mutation leaves both the collection and revision untouched.

use crate::model::expense::ExpenseValidationError;
use crate::model::person::PersonValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ledger;
pub mod roster;

pub use ledger::LedgerStore;
pub use roster::RosterStore;

/// Monotonic commit counter of one store.
pub type Revision = u64;

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Person(PersonValidationError),
    Expense(ExpenseValidationError),
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(err) => write!(f, "{err}"),
            Self::Expense(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "expense index {index} out of range for ledger of {len}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Person(err) => Some(err),
            Self::Expense(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<PersonValidationError> for StoreError {
    fn from(value: PersonValidationError) -> Self {
        Self::Person(value)
    }
}

impl From<ExpenseValidationError> for StoreError {
    fn from(value: ExpenseValidationError) -> Self {
        Self::Expense(value)
    }
}
