//! In-memory document store.
//!
//! Used by tests and by sessions that should not touch disk. Clones share the
//! same underlying map, mirroring how every [`JsonConnection`](super::JsonConnection)
//! clone points at the same directory.

use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::storage::repositories::{
    AccountRepository, ExpenseRepository, NotificationRepository, SettingsRepository,
};
use crate::storage::traits::{Connection, KeyValueStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    documents: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    failing_keys: Arc<Mutex<HashSet<String>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write or remove fail, simulating a full or
    /// read-only disk
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes and removes of `key` alone fail
    pub fn fail_writes_for(&self, key: &str) {
        self.failing_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string());
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Vec<String> {
        let documents = self.lock();
        let mut keys: Vec<String> = documents.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        let key_fails = self
            .failing_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key);
        if key_fails || self.fail_writes.load(Ordering::SeqCst) {
            Err(anyhow!("Store is not writable (key '{}')", key))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryConnection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

impl Connection for MemoryConnection {
    type ExpenseRepository = ExpenseRepository<MemoryConnection>;
    type NotificationRepository = NotificationRepository<MemoryConnection>;
    type SettingsRepository = SettingsRepository<MemoryConnection>;
    type AccountRepository = AccountRepository<MemoryConnection>;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }

    fn create_notification_repository(&self) -> Self::NotificationRepository {
        NotificationRepository::new(self.clone())
    }

    fn create_settings_repository(&self) -> Self::SettingsRepository {
        SettingsRepository::new(self.clone())
    }

    fn create_account_repository(&self) -> Self::AccountRepository {
        AccountRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_documents() {
        let a = MemoryConnection::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.keys(), vec!["k".to_string()]);
    }

    #[test]
    fn test_fail_writes() {
        let store = MemoryConnection::new();
        store.set("k", "v").unwrap();
        store.set_fail_writes(true);

        assert!(store.set("k", "w").is_err());
        assert!(store.remove("k").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.set_fail_writes(false);
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_fail_writes_for_single_key() {
        let store = MemoryConnection::new();
        store.fail_writes_for("broken");

        assert!(store.set("broken", "v").is_err());
        assert!(store.remove("broken").is_err());
        store.set("fine", "v").unwrap();
        assert_eq!(store.keys(), vec!["fine".to_string()]);
    }
}
