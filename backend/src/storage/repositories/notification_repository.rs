use anyhow::{Context, Result};
use shared::NotificationEntry;

use super::{read_document, write_document};
use crate::storage::keys;
use crate::storage::traits::{KeyValueStore, NotificationStorage};

/// Repository for the notification log document
#[derive(Clone)]
pub struct NotificationRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NotificationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> NotificationStorage for NotificationRepository<S> {
    fn load_notifications(&self) -> Result<Vec<NotificationEntry>> {
        Ok(read_document(&self.store, keys::NOTIFICATIONS)?.unwrap_or_default())
    }

    fn save_notifications(&self, notifications: &[NotificationEntry]) -> Result<()> {
        write_document(&self.store, keys::NOTIFICATIONS, notifications)
    }

    fn remove_notifications(&self) -> Result<()> {
        self.store
            .remove(keys::NOTIFICATIONS)
            .context("Failed to remove notifications document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;
    use chrono::Utc;
    use shared::NotificationType;

    #[test]
    fn test_notification_type_is_stored_lowercase() {
        let store = MemoryConnection::new();
        let repo = NotificationRepository::new(store.clone());
        let entry = NotificationEntry {
            id: "n1".to_string(),
            title: "Large Expense Detected".to_string(),
            message: "You spent $150.00 on Bills".to_string(),
            notification_type: NotificationType::Warning,
            timestamp: Utc::now(),
            read: false,
        };
        repo.save_notifications(&[entry.clone()]).unwrap();

        let raw = store.get(keys::NOTIFICATIONS).unwrap().unwrap();
        assert!(raw.contains(r#""type":"warning""#));
        assert_eq!(repo.load_notifications().unwrap(), vec![entry]);
    }
}
