use anyhow::{Context, Result};
use shared::{Credential, UserProfile};

use super::{read_document, write_document};
use crate::storage::keys;
use crate::storage::traits::{AccountStorage, KeyValueStore};

/// Repository for the credentials list and the current-user document
#[derive(Clone)]
pub struct AccountRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AccountRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> AccountStorage for AccountRepository<S> {
    fn load_credentials(&self) -> Result<Vec<Credential>> {
        Ok(read_document(&self.store, keys::CREDENTIALS)?.unwrap_or_default())
    }

    fn save_credentials(&self, credentials: &[Credential]) -> Result<()> {
        write_document(&self.store, keys::CREDENTIALS, credentials)
    }

    fn load_current_user(&self) -> Result<Option<UserProfile>> {
        // A stored `null` means signed out
        let user: Option<Option<UserProfile>> = read_document(&self.store, keys::CURRENT_USER)?;
        Ok(user.flatten())
    }

    fn save_current_user(&self, user: Option<&UserProfile>) -> Result<()> {
        write_document(&self.store, keys::CURRENT_USER, &user)
    }

    fn remove_current_user(&self) -> Result<()> {
        self.store
            .remove(keys::CURRENT_USER)
            .context("Failed to remove current user document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;

    #[test]
    fn test_signed_out_user_round_trips_as_null() {
        let store = MemoryConnection::new();
        let repo = AccountRepository::new(store.clone());

        repo.save_current_user(None).unwrap();
        assert_eq!(store.get(keys::CURRENT_USER).unwrap().as_deref(), Some("null"));
        assert_eq!(repo.load_current_user().unwrap(), None);

        let user = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        repo.save_current_user(Some(&user)).unwrap();
        assert_eq!(repo.load_current_user().unwrap(), Some(user));
    }
}
