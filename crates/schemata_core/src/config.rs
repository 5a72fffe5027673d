//! Runtime configuration for embedding the core.
//!
//! # Responsibility
//! - Describe where the store lives and how logging is set up.
//! - Read overrides from `SCHEMATA_*` environment variables.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SCHEMATA_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "SCHEMATA_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SCHEMATA_LOG_DIR";

/// Backing storage for the metadata store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub store: StoreLocation,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::InMemory,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `SCHEMATA_DB_PATH`, `SCHEMATA_LOG_LEVEL` and
    /// `SCHEMATA_LOG_DIR`. Blank variables count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_ENV) {
            config.store = StoreLocation::File(PathBuf::from(path));
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_ENV).map(PathBuf::from);
        config
    }

    pub fn with_store(mut self, store: StoreLocation) -> Self {
        self.store = store;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.store {
            StoreLocation::InMemory => open_db_in_memory(),
            StoreLocation::File(path) => open_db(path),
        }
    }

    /// Starts file logging when `log_dir` is set; returns whether it did.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir.to_str().ok_or_else(|| {
            LoggingError::InvalidDirectory(format!("`{}` is not UTF-8", log_dir.display()))
        })?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, StoreLocation, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.store, StoreLocation::InMemory);
    }

    #[test]
    fn variables_override_defaults_and_blank_is_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "/tmp/schemata.sqlite3"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "   "),
        ]));

        assert_eq!(
            config.store,
            StoreLocation::File(PathBuf::from("/tmp/schemata.sqlite3"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn logging_is_skipped_without_directory() {
        assert_eq!(CoreConfig::default().init_logging(), Ok(false));
    }

    #[test]
    fn file_store_opens_with_seeded_schema() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            CoreConfig::default().with_store(StoreLocation::File(dir.path().join("store.sqlite3")));

        let conn = config.open_store().expect("file store should open");
        let name: String = conn
            .query_row("SELECT name FROM data_classes WHERE id = 0;", [], |row| {
                row.get(0)
            })
            .expect("string primitive should be seeded");
        assert_eq!(name, "String");
    }
}
