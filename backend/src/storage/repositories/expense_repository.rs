use anyhow::{Context, Result};
use log::debug;
use shared::ExpenseRecord;

use super::{read_document, write_document};
use crate::storage::keys;
use crate::storage::traits::{ExpenseStorage, KeyValueStore};

/// Repository for the expense collection document
#[derive(Clone)]
pub struct ExpenseRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ExpenseRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> ExpenseStorage for ExpenseRepository<S> {
    fn load_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let expenses: Vec<ExpenseRecord> =
            read_document(&self.store, keys::EXPENSES)?.unwrap_or_default();
        debug!("Loaded {} expenses", expenses.len());
        Ok(expenses)
    }

    fn save_expenses(&self, expenses: &[ExpenseRecord]) -> Result<()> {
        write_document(&self.store, keys::EXPENSES, expenses)?;
        debug!("Saved {} expenses", expenses.len());
        Ok(())
    }

    fn remove_expenses(&self) -> Result<()> {
        self.store
            .remove(keys::EXPENSES)
            .context("Failed to remove expenses document")
    }
}
