//! The expense ledger.
//!
//! Holds the ordered expense collection in memory and mirrors it to storage
//! after every mutation. New records go to the front; edits keep their
//! position; deletes remove in place.
//!
//! A failed flush is reported to the caller, but the in-memory change has
//! already happened and stays until the next successful flush or reload.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use shared::{ExpenseDraft, ExpenseRecord, NotificationType, Settings};

use crate::domain::ids::generate_unique_id;
use crate::domain::notification_log::NotificationLog;
use crate::domain::validation::validate_expense;
use crate::error::{TrackerError, TrackerResult};
use crate::storage::{Connection, ExpenseStorage};

/// Amounts strictly above this raise a large-expense warning
pub const LARGE_EXPENSE_THRESHOLD: f64 = 100.0;

pub struct Ledger<C: Connection> {
    repository: C::ExpenseRepository,
    records: Vec<ExpenseRecord>,
}

impl<C: Connection> Ledger<C> {
    /// Load the persisted expense collection
    pub fn load(connection: &C) -> TrackerResult<Self> {
        let repository = connection.create_expense_repository();
        let records = repository.load_expenses()?;
        info!("Loaded ledger with {} expenses", records.len());
        Ok(Self { repository, records })
    }

    /// Validate and store a new expense at the front of the ledger.
    ///
    /// With `large_expense_alert` enabled, an amount above
    /// [`LARGE_EXPENSE_THRESHOLD`] also records a warning in `notifications`.
    pub fn add(
        &mut self,
        draft: ExpenseDraft,
        now: DateTime<Utc>,
        settings: &Settings,
        notifications: &mut NotificationLog<C>,
    ) -> TrackerResult<ExpenseRecord> {
        let valid = validate_expense(&draft)?;

        let id = generate_unique_id("exp", now, |candidate| self.contains(candidate));
        let record = ExpenseRecord {
            id,
            title: valid.title,
            amount: valid.amount,
            category: valid.category,
            date: valid.date,
            notes: valid.notes,
            created_at: now,
            updated_at: now,
        };

        self.records.insert(0, record.clone());
        info!("Added expense {} ({:.2} {})", record.id, record.amount, record.category);
        self.flush("add", &record.id)?;

        if settings.large_expense_alert && record.amount > LARGE_EXPENSE_THRESHOLD {
            let message = format!(
                "You spent ${:.2} on {}",
                record.amount,
                record.display_category().label()
            );
            // Alert failures are logged; the saved expense is still returned
            if let Err(e) =
                notifications.record("Large Expense Detected", &message, NotificationType::Warning, now)
            {
                log::error!("Failed to record large expense alert for {}: {}", record.id, e);
            }
        }

        Ok(record)
    }

    /// Replace every field except `id` and `created_at`, keeping the position
    pub fn update(
        &mut self,
        id: &str,
        patch: ExpenseDraft,
        now: DateTime<Utc>,
    ) -> TrackerResult<ExpenseRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| {
                warn!("update: expense {} not found", id);
                TrackerError::NotFound(id.to_string())
            })?;

        let valid = validate_expense(&patch)?;

        let record = &mut self.records[index];
        record.title = valid.title;
        record.amount = valid.amount;
        record.category = valid.category;
        record.date = valid.date;
        record.notes = valid.notes;
        record.updated_at = now.max(record.created_at);
        let updated = record.clone();

        info!("Updated expense {}", id);
        self.flush("update", id)?;
        Ok(updated)
    }

    /// Remove the expense with `id`. Absent ids are a no-op and return false.
    pub fn remove(&mut self, id: &str) -> TrackerResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            debug!("remove: expense {} not present", id);
            return Ok(false);
        }

        info!("Removed expense {}", id);
        self.flush("remove", id)?;
        Ok(true)
    }

    /// Replace the whole collection (import)
    pub fn replace_all(&mut self, records: Vec<ExpenseRecord>) -> TrackerResult<()> {
        info!("Replacing ledger: {} -> {} expenses", self.records.len(), records.len());
        self.records = records;
        self.flush("replace_all", "*")
    }

    /// Empty the ledger, keeping an empty document in storage
    pub fn clear(&mut self) -> TrackerResult<()> {
        self.records.clear();
        self.flush("clear", "*")
    }

    /// Empty the ledger and drop its document (account deletion)
    pub fn remove_document(&mut self) -> TrackerResult<()> {
        self.records.clear();
        self.repository.remove_expenses()?;
        Ok(())
    }

    /// Copy of the full collection in ledger order
    pub fn list(&self) -> Vec<ExpenseRecord> {
        self.records.clone()
    }

    /// Borrowed view for read-only computations
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<ExpenseRecord> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self, operation: &str, id: &str) -> TrackerResult<()> {
        self.repository.save_expenses(&self.records).map_err(|e| {
            log::error!("Failed to flush ledger after {} of {}: {:#}", operation, id, e);
            TrackerError::Storage(e)
        })
    }
}
