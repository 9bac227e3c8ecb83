//! Expense domain model.
//!
//! # Responsibility
//! - Define the ledger record: a named mapping from person name to amount.
//! - Provide the draft shape used by add/edit forms and its conversion into
//!   a committed record.
//!
//! # Invariants
//! - `amounts` need not cover every roster member; a missing entry reads as 0.
//! - Entries for people no longer in the roster are retained until the record
//!   is rebuilt from a draft.
//! - Newly committed amounts are finite and non-negative. Decoded amounts are
//!   kept as-is, including non-numeric values, and read as 0.

use crate::model::person::Person;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One per-person amount as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    /// Anything that is not a JSON number, typically a hand-edited link.
    Malformed(serde_json::Value),
}

impl Amount {
    /// Numeric value used by aggregation; non-numeric and non-finite read as 0.
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(value) if value.is_finite() => *value,
            _ => 0.0,
        }
    }
}

/// Ledger record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExpenseWire")]
pub struct Expense {
    pub name: String,
    pub amounts: BTreeMap<String, Amount>,
}

/// Accepted snapshot shapes for one expense.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpenseWire {
    Explicit(ExplicitRecord),
    Flat(FlatRecord),
}

#[derive(Deserialize)]
struct ExplicitRecord {
    name: String,
    amounts: BTreeMap<String, Amount>,
}

/// Older link encoding: person amounts sit next to `name`.
#[derive(Deserialize)]
struct FlatRecord {
    name: String,
    #[serde(flatten)]
    amounts: BTreeMap<String, Amount>,
}

impl From<ExpenseWire> for Expense {
    fn from(value: ExpenseWire) -> Self {
        let (name, amounts) = match value {
            ExpenseWire::Explicit(record) => (record.name, record.amounts),
            ExpenseWire::Flat(record) => (record.name, record.amounts),
        };
        Self { name, amounts }
    }
}

/// Validation failures for ledger writes.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    EmptyName,
    InvalidAmount { person: String, value: String },
}

impl Display for ExpenseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "expense name cannot be empty"),
            Self::InvalidAmount { person, value } => write!(
                f,
                "amount `{value}` for `{person}` must be a finite non-negative number"
            ),
        }
    }
}

impl Error for ExpenseValidationError {}

/// Working form state for adding or editing one expense.
///
/// Owned by the caller; nothing here is persisted until it is turned into an
/// [`Expense`] and committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub name: String,
    pub amounts: BTreeMap<String, f64>,
}

impl Expense {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amounts: BTreeMap::new(),
        }
    }

    /// Builder-style amount setter.
    pub fn with_amount(mut self, person: impl Into<String>, value: f64) -> Self {
        self.amounts.insert(person.into(), Amount::Number(value));
        self
    }

    /// Builds a record covering every current roster member.
    ///
    /// People missing from the draft (or holding a non-finite draft value)
    /// get 0. Draft entries for people outside the roster are dropped.
    pub fn from_draft(
        draft: &ExpenseDraft,
        roster: &[Person],
    ) -> Result<Self, ExpenseValidationError> {
        let amounts = roster
            .iter()
            .map(|person| {
                let value = draft
                    .amounts
                    .get(person.name.as_str())
                    .copied()
                    .filter(|value| value.is_finite())
                    .unwrap_or(0.0);
                (person.name.clone(), Amount::Number(value))
            })
            .collect();

        let expense = Self {
            name: draft.name.clone(),
            amounts,
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Checks invariants required before a store commit.
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }

        for (person, amount) in &self.amounts {
            let valid = matches!(amount, Amount::Number(value) if value.is_finite() && *value >= 0.0);
            if !valid {
                return Err(ExpenseValidationError::InvalidAmount {
                    person: person.clone(),
                    value: match amount {
                        Amount::Number(value) => value.to_string(),
                        Amount::Malformed(raw) => raw.to_string(),
                    },
                });
            }
        }

        Ok(())
    }

    /// Amount for one person, missing or non-numeric reading as 0.
    pub fn amount_for(&self, person: &str) -> f64 {
        self.amounts.get(person).map_or(0.0, Amount::value)
    }
}
