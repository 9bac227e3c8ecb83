//! Person domain model.
//!
//! # Responsibility
//! - Define the roster entry shared by the ledger columns and split selection.
//!
//! # Invariants
//! - `name` is non-empty and never renamed after creation.
//! - `checked` is transient selection state; it round-trips through snapshots
//!   but carries no ledger meaning.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One tracked participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique roster key, also used as the column key in expense amounts.
    pub name: String,
    /// Selection flag used while entering an equal split.
    #[serde(default)]
    pub checked: bool,
}

/// Validation failures for roster additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    DuplicateName(String),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "person name cannot be empty"),
            Self::DuplicateName(name) => write!(f, "person `{name}` is already in the roster"),
        }
    }
}

impl Error for PersonValidationError {}

impl Person {
    /// Creates an unchecked person.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
        }
    }

    /// Validates this person against the roster it is about to join.
    ///
    /// Name comparison is exact: `"a"` and `"A"` are different people.
    pub fn validate_against(&self, roster: &[Person]) -> Result<(), PersonValidationError> {
        if self.name.is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if roster.iter().any(|person| person.name == self.name) {
            return Err(PersonValidationError::DuplicateName(self.name.clone()));
        }
        Ok(())
    }
}
