//! Derived figures over the roster and ledger.
//!
//! Everything here is a pure function of the collections passed in. Nothing
//! is cached, so callers always read figures for the current state.

use crate::model::expense::{Expense, ExpenseDraft};
use crate::model::person::Person;
use std::collections::BTreeMap;

/// Sum of one person's amounts across the ledger.
///
/// Missing entries and non-numeric stored values count as 0.
pub fn column_total(expenses: &[Expense], person: &str) -> f64 {
    expenses
        .iter()
        .map(|expense| expense.amount_for(person))
        .sum()
}

/// Totals row in roster order.
pub fn column_totals(people: &[Person], expenses: &[Expense]) -> Vec<(String, f64)> {
    people
        .iter()
        .map(|person| (person.name.clone(), column_total(expenses, &person.name)))
        .collect()
}

/// Equal share of `total` for each selected person.
///
/// Returns `None` when nobody is selected or `total` is not finite, so no
/// invalid number ever reaches stored amounts. Shares are rounded half-up to
/// cents and may not sum back to `total` exactly.
pub fn equal_split<S: AsRef<str>>(total: f64, selected: &[S]) -> Option<BTreeMap<String, f64>> {
    if selected.is_empty() || !total.is_finite() {
        return None;
    }

    let share = round_cents(total / selected.len() as f64);
    Some(
        selected
            .iter()
            .map(|name| (name.as_ref().to_string(), share))
            .collect(),
    )
}

/// Edit-form amounts for `expense`, limited to people present in `people`.
///
/// Stored entries for people no longer in the roster are left out here; they
/// disappear from the record only once the draft is saved back.
pub fn edit_amounts(expense: &Expense, people: &[Person]) -> BTreeMap<String, f64> {
    people
        .iter()
        .filter_map(|person| {
            expense
                .amounts
                .get(person.name.as_str())
                .map(|amount| (person.name.clone(), amount.value()))
        })
        .collect()
}

/// Draft pre-populated from an existing record.
pub fn edit_draft(expense: &Expense, people: &[Person]) -> ExpenseDraft {
    ExpenseDraft {
        name: expense.name.clone(),
        amounts: edit_amounts(expense, people),
    }
}

/// Half-up rounding to two decimals.
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    rounded / 100.0
}
