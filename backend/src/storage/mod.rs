//! # Storage Module
//!
//! Handles all data persistence for the expense tracker.
//!
//! Everything is persisted as whole JSON documents under fixed keys, one
//! document per concern (credentials, current user, expenses, settings,
//! notifications). Every mutation rewrites the complete document; there is no
//! incremental patching and no write-ahead log.
//!
//! ## Layers
//!
//! - **Key-value stores**: [`JsonConnection`] keeps one `<key>.json` file per
//!   document in a data directory, [`MemoryConnection`] keeps documents in a
//!   map for tests and throwaway sessions.
//! - **Repositories**: typed access to each document, generic over the store.
//! - **Connection**: factory trait the domain layer uses to obtain
//!   repositories without knowing which store backs them.

pub mod json;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json::JsonConnection;
pub use memory::MemoryConnection;
pub use repositories::{
    AccountRepository, ExpenseRepository, NotificationRepository, SettingsRepository,
};
pub use traits::{
    AccountStorage, Connection, ExpenseStorage, KeyValueStore, NotificationStorage,
    SettingsStorage,
};

/// Document keys
pub mod keys {
    pub const CREDENTIALS: &str = "expense_tracker_users";
    pub const CURRENT_USER: &str = "expense_tracker_user";
    pub const EXPENSES: &str = "expense_tracker_expenses";
    pub const SETTINGS: &str = "expense_tracker_settings";
    pub const NOTIFICATIONS: &str = "expense_tracker_notifications";
}
