//! # Storage Traits
//!
//! Storage abstractions that let the domain layer work against any backing
//! store. All operations are synchronous.

use anyhow::Result;
use shared::{Credential, ExpenseRecord, NotificationEntry, Settings, UserProfile};

/// Raw document store, the equivalent of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Persistence of the expense collection
pub trait ExpenseStorage: Send + Sync {
    /// Load the full expense sequence in stored order
    fn load_expenses(&self) -> Result<Vec<ExpenseRecord>>;

    /// Rewrite the full expense sequence
    fn save_expenses(&self, expenses: &[ExpenseRecord]) -> Result<()>;

    fn remove_expenses(&self) -> Result<()>;
}

/// Persistence of the notification log
pub trait NotificationStorage: Send + Sync {
    fn load_notifications(&self) -> Result<Vec<NotificationEntry>>;

    fn save_notifications(&self, notifications: &[NotificationEntry]) -> Result<()>;

    fn remove_notifications(&self) -> Result<()>;
}

/// Persistence of user preferences
pub trait SettingsStorage: Send + Sync {
    /// Load settings merged over the defaults
    fn load_settings(&self) -> Result<Settings>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;

    fn remove_settings(&self) -> Result<()>;
}

/// Persistence of the credentials list and the signed-in user
pub trait AccountStorage: Send + Sync {
    fn load_credentials(&self) -> Result<Vec<Credential>>;

    fn save_credentials(&self, credentials: &[Credential]) -> Result<()>;

    fn load_current_user(&self) -> Result<Option<UserProfile>>;

    /// Store the signed-in user; `None` is written as an explicit null
    fn save_current_user(&self, user: Option<&UserProfile>) -> Result<()>;

    fn remove_current_user(&self) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts away the specific store (directory of JSON files, in-memory map)
/// and provides factory methods for the repositories the domain layer needs.
pub trait Connection: Send + Sync + Clone {
    type ExpenseRepository: ExpenseStorage;
    type NotificationRepository: NotificationStorage;
    type SettingsRepository: SettingsStorage;
    type AccountRepository: AccountStorage;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;

    fn create_notification_repository(&self) -> Self::NotificationRepository;

    fn create_settings_repository(&self) -> Self::SettingsRepository;

    fn create_account_repository(&self) -> Self::AccountRepository;
}
