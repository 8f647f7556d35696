//! Local accounts: the credentials list and the signed-in user.
//!
//! Passwords are stored base64-obfuscated, not hashed. This only keeps them
//! from being readable at a glance in the data directory.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use log::{info, warn};
use shared::{Credential, UserProfile};

use crate::domain::validation::validate_sign_up;
use crate::error::{TrackerError, TrackerResult};
use crate::storage::{AccountStorage, Connection};

pub fn obfuscate_password(password: &str) -> String {
    B64.encode(password.as_bytes())
}

pub struct AccountService<C: Connection> {
    repository: C::AccountRepository,
    current_user: Option<UserProfile>,
}

impl<C: Connection> AccountService<C> {
    pub fn load(connection: &C) -> TrackerResult<Self> {
        let repository = connection.create_account_repository();
        let current_user = repository.load_current_user()?;
        if let Some(user) = &current_user {
            info!("Restored session for {}", user.email);
        }
        Ok(Self {
            repository,
            current_user,
        })
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.current_user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Register a new account and sign it in
    pub fn sign_up(&mut self, name: &str, email: &str, password: &str) -> TrackerResult<UserProfile> {
        let valid = validate_sign_up(name, email, password)?;

        let mut credentials = self.repository.load_credentials()?;
        if credentials.iter().any(|c| c.email == valid.email) {
            warn!("sign_up: email {} already registered", valid.email);
            return Err(TrackerError::EmailAlreadyRegistered(valid.email));
        }

        credentials.push(Credential {
            name: valid.name.clone(),
            email: valid.email.clone(),
            password: obfuscate_password(&valid.password),
        });
        self.repository.save_credentials(&credentials)?;

        let user = UserProfile {
            name: valid.name,
            email: valid.email,
        };
        info!("Registered account {}", user.email);
        self.set_current_user(Some(user.clone()))?;
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> TrackerResult<UserProfile> {
        let email = email.trim();
        let obfuscated = obfuscate_password(password);

        let credentials = self.repository.load_credentials()?;
        let credential = credentials
            .iter()
            .find(|c| c.email == email && c.password == obfuscated)
            .ok_or_else(|| {
                warn!("login: rejected credentials for {}", email);
                TrackerError::InvalidCredentials
            })?;

        let user = UserProfile {
            name: credential.name.clone(),
            email: credential.email.clone(),
        };
        info!("Signed in {}", user.email);
        self.set_current_user(Some(user.clone()))?;
        Ok(user)
    }

    pub fn logout(&mut self) -> TrackerResult<()> {
        if let Some(user) = &self.current_user {
            info!("Signed out {}", user.email);
        }
        self.set_current_user(None)
    }

    /// Remove the signed-in user's credential and the current-user document.
    ///
    /// Returns the removed profile.
    pub fn delete_account(&mut self) -> TrackerResult<UserProfile> {
        let user = self.current_user.clone().ok_or(TrackerError::NotAuthenticated)?;

        let mut credentials = self.repository.load_credentials()?;
        credentials.retain(|c| c.email != user.email);
        self.repository.save_credentials(&credentials)?;

        self.current_user = None;
        self.repository.remove_current_user()?;
        info!("Deleted account {}", user.email);
        Ok(user)
    }

    fn set_current_user(&mut self, user: Option<UserProfile>) -> TrackerResult<()> {
        self.current_user = user;
        self.repository.save_current_user(self.current_user.as_ref())?;
        Ok(())
    }
}
