//! In-app notification log.
//!
//! Newest entries first. The log only shrinks through [`NotificationLog::clear_all`].

use chrono::{DateTime, Utc};
use log::{debug, info};
use shared::{NotificationEntry, NotificationType};

use crate::domain::ids::generate_unique_id;
use crate::error::TrackerResult;
use crate::storage::{Connection, NotificationStorage};

pub struct NotificationLog<C: Connection> {
    repository: C::NotificationRepository,
    entries: Vec<NotificationEntry>,
}

impl<C: Connection> NotificationLog<C> {
    /// Load the persisted log
    pub fn load(connection: &C) -> TrackerResult<Self> {
        let repository = connection.create_notification_repository();
        let entries = repository.load_notifications()?;
        debug!("Loaded {} notifications", entries.len());
        Ok(Self { repository, entries })
    }

    /// Prepend a new unread entry and flush
    pub fn record(
        &mut self,
        title: &str,
        message: &str,
        notification_type: NotificationType,
        now: DateTime<Utc>,
    ) -> TrackerResult<NotificationEntry> {
        let id = generate_unique_id("ntf", now, |candidate| {
            self.entries.iter().any(|n| n.id == candidate)
        });
        let entry = NotificationEntry {
            id,
            title: title.to_string(),
            message: message.to_string(),
            notification_type,
            timestamp: now,
            read: false,
        };
        self.entries.insert(0, entry.clone());
        info!("Recorded {:?} notification {}: {}", notification_type, entry.id, title);

        self.flush()?;
        Ok(entry)
    }

    /// Mark one entry read; returns false when no entry has `id`
    pub fn mark_read(&mut self, id: &str) -> TrackerResult<bool> {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) => {
                if !entry.read {
                    entry.read = true;
                    self.flush()?;
                }
                Ok(true)
            }
            None => {
                debug!("mark_read: no notification {}", id);
                Ok(false)
            }
        }
    }

    /// Mark every entry read, returning how many changed
    pub fn mark_all_read(&mut self) -> TrackerResult<usize> {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|n| !n.read) {
            entry.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.flush()?;
        }
        Ok(changed)
    }

    pub fn clear_all(&mut self) -> TrackerResult<()> {
        self.entries.clear();
        info!("Cleared all notifications");
        self.flush()
    }

    /// Drop the persisted document entirely (account deletion)
    pub fn remove_document(&mut self) -> TrackerResult<()> {
        self.entries.clear();
        self.repository.remove_notifications()?;
        Ok(())
    }

    pub fn list(&self) -> Vec<NotificationEntry> {
        self.entries.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> TrackerResult<()> {
        self.repository.save_notifications(&self.entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::storage::MemoryConnection;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_record_prepends_unread_entry() {
        let connection = MemoryConnection::new();
        let mut log = NotificationLog::load(&connection).unwrap();

        log.record("First", "one", NotificationType::Info, now()).unwrap();
        let second = log.record("Second", "two", NotificationType::Success, now()).unwrap();

        let entries = log.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], second);
        assert!(!entries[0].read);
        assert_ne!(entries[0].id, entries[1].id);
        assert_eq!(log.unread_count(), 2);
    }

    #[test]
    fn test_entries_survive_reload() {
        let connection = MemoryConnection::new();
        let mut log = NotificationLog::load(&connection).unwrap();
        let entry = log.record("Saved", "persisted", NotificationType::Warning, now()).unwrap();

        let reloaded = NotificationLog::load(&connection).unwrap();
        assert_eq!(reloaded.list(), vec![entry]);
    }

    #[test]
    fn test_mark_read_and_missing_id() {
        let connection = MemoryConnection::new();
        let mut log = NotificationLog::load(&connection).unwrap();
        let entry = log.record("Hello", "world", NotificationType::Info, now()).unwrap();

        assert!(log.mark_read(&entry.id).unwrap());
        assert_eq!(log.unread_count(), 0);
        assert!(!log.mark_read("missing").unwrap());
        assert!(NotificationLog::load(&connection).unwrap().list()[0].read);
    }

    #[test]
    fn test_mark_all_read_and_clear() {
        let connection = MemoryConnection::new();
        let mut log = NotificationLog::load(&connection).unwrap();
        for i in 0..3 {
            log.record(&format!("n{}", i), "m", NotificationType::Info, now()).unwrap();
        }

        assert_eq!(log.mark_all_read().unwrap(), 3);
        assert_eq!(log.mark_all_read().unwrap(), 0);

        log.clear_all().unwrap();
        assert!(log.is_empty());
        assert!(NotificationLog::load(&connection).unwrap().is_empty());
    }

    #[test]
    fn test_flush_failure_surfaces_after_in_memory_change() {
        let connection = MemoryConnection::new();
        let mut log = NotificationLog::load(&connection).unwrap();
        connection.set_fail_writes(true);

        let err = log.record("x", "y", NotificationType::Error, now()).unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(log.len(), 1);
    }
}
