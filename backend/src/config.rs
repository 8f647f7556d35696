//! # Configuration
//!
//! Runtime settings for the command host, resolved in this order (later wins):
//!
//! 1. Defaults: data in `~/Documents/Expense Tracker`, log filter `info`
//! 2. A YAML file named by `EXPENSE_TRACKER_CONFIG`
//! 3. `EXPENSE_TRACKER_DATA_DIR`, overriding the data directory only
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/home/ada/expenses"
//! log_filter: "expense_tracker_backend=debug"
//! ```
//!
//! Both keys are optional.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "EXPENSE_TRACKER_CONFIG";
pub const DATA_DIR_ENV: &str = "EXPENSE_TRACKER_DATA_DIR";
pub const DEFAULT_LOG_FILTER: &str = "info";
const DATA_FOLDER_NAME: &str = "Expense Tracker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory holding one JSON file per document
    pub data_directory: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

/// Contents of the YAML config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_directory: Option<PathBuf>,
    log_filter: Option<String>,
}

impl TrackerConfig {
    /// Resolve from the process environment
    pub fn load() -> Result<Self> {
        let file_contents = match env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Some(contents)
            }
            None => None,
        };

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .ok();
        let data_dir_override = env::var(DATA_DIR_ENV).ok();

        Self::from_sources(
            file_contents.as_deref(),
            data_dir_override.as_deref(),
            home.as_deref(),
        )
    }

    /// Resolve from explicit inputs
    pub fn from_sources(
        file_contents: Option<&str>,
        data_dir_override: Option<&str>,
        home: Option<&str>,
    ) -> Result<Self> {
        let file: ConfigFile = match file_contents {
            Some(yaml) if !yaml.trim().is_empty() => {
                serde_yaml::from_str(yaml).context("Config file is not valid YAML")?
            }
            _ => ConfigFile::default(),
        };

        let data_directory = match (data_dir_override.filter(|d| !d.is_empty()), file.data_directory) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Some(dir)) => dir,
            (None, None) => default_data_directory(home)?,
        };

        Ok(Self {
            data_directory,
            log_filter: file
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

/// `<home>/Documents/Expense Tracker`
fn default_data_directory(home: Option<&str>) -> Result<PathBuf> {
    let home = home
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("Cannot determine home directory; set {}", DATA_DIR_ENV))?;
    Ok(PathBuf::from(home).join("Documents").join(DATA_FOLDER_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_home() {
        let config = TrackerConfig::from_sources(None, None, Some("/home/ada")).unwrap();
        assert_eq!(
            config.data_directory,
            PathBuf::from("/home/ada/Documents/Expense Tracker")
        );
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_file_then_env_override() {
        let yaml = "data_directory: /srv/expenses\nlog_filter: debug\n";

        let config = TrackerConfig::from_sources(Some(yaml), None, None).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/srv/expenses"));
        assert_eq!(config.log_filter, "debug");

        let config = TrackerConfig::from_sources(Some(yaml), Some("/tmp/override"), None).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/tmp/override"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_missing_home_without_override_fails() {
        assert!(TrackerConfig::from_sources(None, None, None).is_err());
        assert!(TrackerConfig::from_sources(Some(""), Some("/data"), None).is_ok());
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let err = TrackerConfig::from_sources(Some("data_directory: [unclosed"), None, Some("/h")).unwrap_err();
        assert!(err.to_string().contains("not valid YAML"));
    }
}
