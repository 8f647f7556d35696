//! Test utilities for automatic cleanup and consistent test infrastructure
//!
//! The temporary data directory is removed when the environment is dropped,
//! even if a test panics.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::json::JsonConnection;

/// Test environment holding a temporary data directory and a connection to it
pub struct TestEnvironment {
    pub connection: JsonConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = JsonConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}
