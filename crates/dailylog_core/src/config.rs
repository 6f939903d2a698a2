//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//! - Provide defaults so a bare invocation works in the current directory.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution never mutates the process environment.

use crate::logging::{default_log_level, LoggingConfig};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "DAILYLOG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "DAILYLOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "DAILYLOG_LOG_DIR";
pub const LOG_STDERR_ENV: &str = "DAILYLOG_LOG_STDERR";
pub const DEFAULT_DB_FILE_NAME: &str = "dailylog.sqlite3";

/// Settings needed to open the store and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    /// Mirror warnings and errors to stderr while file logging is on.
    pub log_to_stderr: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            log_to_stderr: false,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
            log_to_stderr: read(LOG_STDERR_ENV).is_some_and(|value| is_truthy(&value)),
        }
    }

    /// Logging settings, or `None` when no log directory is configured.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.log_dir.as_ref().map(|dir| LoggingConfig {
            level: self.log_level.clone(),
            log_dir: dir.clone(),
            duplicate_to_stderr: self.log_to_stderr,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
