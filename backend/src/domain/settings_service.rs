//! User preferences and the theme derived from them.

use log::info;
use shared::{Settings, SettingsPatch, Theme};

use crate::error::TrackerResult;
use crate::storage::{Connection, SettingsStorage};

pub struct SettingsService<C: Connection> {
    repository: C::SettingsRepository,
    settings: Settings,
}

impl<C: Connection> SettingsService<C> {
    /// Load stored settings merged over the defaults
    pub fn load(connection: &C) -> TrackerResult<Self> {
        let repository = connection.create_settings_repository();
        let settings = repository.load_settings()?;
        Ok(Self { repository, settings })
    }

    pub fn get(&self) -> Settings {
        self.settings
    }

    pub fn theme(&self) -> Theme {
        if self.settings.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> TrackerResult<Settings> {
        self.settings.dark_mode = enabled;
        info!("Dark mode set to {}", enabled);
        self.flush()
    }

    pub fn set_notifications(&mut self, enabled: bool) -> TrackerResult<Settings> {
        self.settings.notifications = enabled;
        info!("Notifications set to {}", enabled);
        self.flush()
    }

    pub fn set_large_expense_alert(&mut self, enabled: bool) -> TrackerResult<Settings> {
        self.settings.large_expense_alert = enabled;
        info!("Large expense alert set to {}", enabled);
        self.flush()
    }

    /// Merge the keys present in `patch` over the current settings
    pub fn merge(&mut self, patch: SettingsPatch) -> TrackerResult<Settings> {
        if let Some(dark_mode) = patch.dark_mode {
            self.settings.dark_mode = dark_mode;
        }
        if let Some(notifications) = patch.notifications {
            self.settings.notifications = notifications;
        }
        if let Some(large_expense_alert) = patch.large_expense_alert {
            self.settings.large_expense_alert = large_expense_alert;
        }
        self.flush()
    }

    /// Forget stored preferences and return to the defaults
    pub fn reset(&mut self) -> TrackerResult<()> {
        self.settings = Settings::default();
        self.repository.remove_settings()?;
        Ok(())
    }

    fn flush(&self) -> TrackerResult<Settings> {
        self.repository.save_settings(&self.settings)?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;

    #[test]
    fn test_defaults_and_theme() {
        let service = SettingsService::load(&MemoryConnection::new()).unwrap();
        assert_eq!(service.get(), Settings::default());
        assert_eq!(service.theme(), Theme::Light);
    }

    #[test]
    fn test_toggles_persist() {
        let connection = MemoryConnection::new();
        let mut service = SettingsService::load(&connection).unwrap();
        service.set_dark_mode(true).unwrap();
        service.set_large_expense_alert(false).unwrap();

        let reloaded = SettingsService::load(&connection).unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);
        assert!(!reloaded.get().large_expense_alert);
        assert!(reloaded.get().notifications);
    }

    #[test]
    fn test_merge_only_touches_present_keys() {
        let connection = MemoryConnection::new();
        let mut service = SettingsService::load(&connection).unwrap();
        service.set_notifications(false).unwrap();

        let merged = service
            .merge(SettingsPatch {
                dark_mode: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(merged.dark_mode);
        assert!(!merged.notifications);
        assert!(merged.large_expense_alert);
    }

    #[test]
    fn test_reset_removes_document() {
        let connection = MemoryConnection::new();
        let mut service = SettingsService::load(&connection).unwrap();
        service.set_dark_mode(true).unwrap();
        service.reset().unwrap();

        assert_eq!(service.get(), Settings::default());
        assert!(connection.keys().is_empty());
    }
}
