//! Snapshot encoding shared by both persistence channels.
//!
//! Roster and ledger are each encoded as one JSON array string; the same text
//! goes to durable storage and, form-encoded, into the link query.

use crate::model::expense::Expense;
use crate::model::person::Person;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PEOPLE_KEY: &str = "people";
pub const EXPENSES_KEY: &str = "expenses";

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// The two independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Roster,
    Ledger,
}

impl Collection {
    /// Storage key and link parameter name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Roster => PEOPLE_KEY,
            Self::Ledger => EXPENSES_KEY,
        }
    }
}

#[derive(Debug)]
pub struct SnapshotError(serde_json::Error);

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid snapshot: {}", self.0)
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self(value)
    }
}

pub fn encode_roster(people: &[Person]) -> SnapshotResult<String> {
    encode(people)
}

pub fn decode_roster(raw: &str) -> SnapshotResult<Vec<Person>> {
    decode(raw)
}

pub fn encode_ledger(expenses: &[Expense]) -> SnapshotResult<String> {
    encode(expenses)
}

pub fn decode_ledger(raw: &str) -> SnapshotResult<Vec<Expense>> {
    decode(raw)
}

/// Serialized form of an emptied collection.
pub fn empty_snapshot() -> &'static str {
    "[]"
}

fn encode<T: Serialize>(items: &[T]) -> SnapshotResult<String> {
    Ok(serde_json::to_string(items)?)
}

fn decode<T: DeserializeOwned>(raw: &str) -> SnapshotResult<Vec<T>> {
    Ok(serde_json::from_str(raw)?)
}
