use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::repositories::{
    AccountRepository, ExpenseRepository, NotificationRepository, SettingsRepository,
};
use crate::storage::traits::{Connection, KeyValueStore};

/// JsonConnection manages the data directory holding one file per document
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection, creating the data directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file backing `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", key))
    }

    fn validate_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(anyhow!("Invalid document key '{}'", key))
        }
    }
}

impl KeyValueStore for JsonConnection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;
        let path = self.document_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let path = self.document_path(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::validate_key(key)?;
        let path = self.document_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

impl Connection for JsonConnection {
    type ExpenseRepository = ExpenseRepository<JsonConnection>;
    type NotificationRepository = NotificationRepository<JsonConnection>;
    type SettingsRepository = SettingsRepository<JsonConnection>;
    type AccountRepository = AccountRepository<JsonConnection>;

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
    use crate::storage::test_utils::TestEnvironment;

    #[test]
    fn test_new_creates_missing_directory() {
        let env = TestEnvironment::new().unwrap();
        let nested = env.base_path.join("nested").join("data");

        let connection = JsonConnection::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(connection.base_directory(), nested.as_path());
    }

    #[test]
    fn test_set_get_remove() {
        let env = TestEnvironment::new().unwrap();
        let connection = &env.connection;

        assert_eq!(connection.get("expense_tracker_settings").unwrap(), None);

        connection.set("expense_tracker_settings", r#"{"darkMode":true}"#).unwrap();
        assert_eq!(
            connection.get("expense_tracker_settings").unwrap().as_deref(),
            Some(r#"{"darkMode":true}"#)
        );
        assert!(connection.document_path("expense_tracker_settings").exists());
        assert!(!env.base_path.join("expense_tracker_settings.json.tmp").exists());

        connection.remove("expense_tracker_settings").unwrap();
        assert_eq!(connection.get("expense_tracker_settings").unwrap(), None);

        // Removing again is fine
        connection.remove("expense_tracker_settings").unwrap();
    }

    #[test]
    fn test_set_overwrites_whole_document() {
        let env = TestEnvironment::new().unwrap();
        env.connection.set("doc", "[1,2,3]").unwrap();
        env.connection.set("doc", "[]").unwrap();
        assert_eq!(env.connection.get("doc").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.connection.set("../escape", "{}").is_err());
        assert!(env.connection.get("").is_err());
    }

    #[test]
    fn test_documents_persist_across_connections() {
        let env = TestEnvironment::new().unwrap();
        env.connection.set("expense_tracker_user", r#"{"name":"Ada","email":"a@b.c"}"#).unwrap();

        let reopened = JsonConnection::new(&env.base_path).unwrap();
        assert!(reopened.get("expense_tracker_user").unwrap().is_some());
    }
}
