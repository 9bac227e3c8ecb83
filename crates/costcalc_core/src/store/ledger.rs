//! Ledger store: the ordered list of expense records.

use crate::model::expense::Expense;
use crate::store::{Revision, StoreError, StoreResult};
use std::sync::Arc;

/// Owner of the current ledger collection.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    expenses: Arc<Vec<Expense>>,
    revision: Revision,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.as_slice()
    }

    /// Shared handle to the current collection; identity changes on commit.
    pub fn snapshot(&self) -> Arc<Vec<Expense>> {
        Arc::clone(&self.expenses)
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Expense> {
        self.expenses.get(index)
    }

    /// Appends a validated record.
    pub fn add_expense(&mut self, expense: Expense) -> StoreResult<()> {
        expense.validate()?;

        let mut next = Vec::with_capacity(self.expenses.len() + 1);
        next.extend(self.expenses.iter().cloned());
        next.push(expense);
        self.commit(next);
        Ok(())
    }

    /// Replaces the record at `index` with a validated one.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index` does not address an existing record.
    pub fn replace_expense_at(&mut self, index: usize, expense: Expense) -> StoreResult<()> {
        if index >= self.expenses.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.expenses.len(),
            });
        }
        expense.validate()?;

        let mut next: Vec<Expense> = self.expenses.as_ref().clone();
        next[index] = expense;
        self.commit(next);
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.commit(Vec::new());
    }

    /// Replaces the whole ledger with a decoded snapshot.
    ///
    /// Decoded records are not re-validated so hand-edited values survive.
    pub fn replace_all(&mut self, expenses: Vec<Expense>) {
        self.commit(expenses);
    }

    fn commit(&mut self, next: Vec<Expense>) {
        self.expenses = Arc::new(next);
        self.revision += 1;
    }
}
