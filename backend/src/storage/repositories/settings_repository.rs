use anyhow::{Context, Result};
use shared::Settings;

use super::{read_document, write_document};
use crate::storage::keys;
use crate::storage::traits::{KeyValueStore, SettingsStorage};

/// Repository for the settings document
#[derive(Clone)]
pub struct SettingsRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> SettingsStorage for SettingsRepository<S> {
    fn load_settings(&self) -> Result<Settings> {
        // Settings deserializes with per-field defaults, so a partial document
        // merges over the defaults and unknown keys drop out.
        Ok(read_document(&self.store, keys::SETTINGS)?.unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        write_document(&self.store, keys::SETTINGS, settings)
    }

    fn remove_settings(&self) -> Result<()> {
        self.store
            .remove(keys::SETTINGS)
            .context("Failed to remove settings document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;

    #[test]
    fn test_missing_document_loads_defaults() {
        let repo = SettingsRepository::new(MemoryConnection::new());
        assert_eq!(repo.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let store = MemoryConnection::new();
        store
            .set(keys::SETTINGS, r#"{"largeExpenseAlert": false, "legacyFlag": 1}"#)
            .unwrap();
        let repo = SettingsRepository::new(store);

        let settings = repo.load_settings().unwrap();
        assert!(!settings.large_expense_alert);
        assert!(!settings.dark_mode);
        assert!(settings.notifications);
    }
}
