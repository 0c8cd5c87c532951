//! Store location configuration.
//!
//! # Responsibility
//! - Resolve which SQLite file backs the record store.
//!
//! # Invariants
//! - Resolution order is explicit path, then `RMS_DB_PATH`, then the default
//!   `records.db` in the working directory.
//! - Blank values are treated as absent.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database file location.
pub const DB_PATH_ENV: &str = "RMS_DB_PATH";
/// File name used when nothing else is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "records.db";

/// Location of the SQLite file backing a `RecordStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Resolves configuration from an optional explicit path and the process
    /// environment.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let from_env = std::env::var(DB_PATH_ENV).ok();
        Self::resolve_with(explicit, from_env.as_deref())
    }

    fn resolve_with(explicit: Option<&Path>, from_env: Option<&str>) -> Self {
        if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
            return Self::new(path);
        }
        if let Some(raw) = from_env {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}
