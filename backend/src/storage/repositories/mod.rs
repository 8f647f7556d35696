//! Typed repositories over a [`KeyValueStore`](super::KeyValueStore).
//!
//! Each repository owns exactly one document key and (de)serializes the whole
//! document on every call.

pub mod account_repository;
pub mod expense_repository;
pub mod notification_repository;
pub mod settings_repository;

pub use account_repository::AccountRepository;
pub use expense_repository::ExpenseRepository;
pub use notification_repository::NotificationRepository;
pub use settings_repository::SettingsRepository;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;

/// Read and parse a document, `None` when the key has never been written
pub(crate) fn read_document<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Document '{}' is not valid JSON for its type", key))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Serialize and write a whole document
pub(crate) fn write_document<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize document '{}'", key))?;
    store
        .set(key, &raw)
        .with_context(|| format!("Failed to write document '{}'", key))
}
