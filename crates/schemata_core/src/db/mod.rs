//! Metadata store bootstrap.
//!
//! # Responsibility
//! - Open the SQLite file (or in-memory database) backing the class,
//!   property, relation and object tables.
//! - Bring the store to the latest table layout and verify its seed rows.
//!
//! # Invariants
//! - The applied migration is mirrored in `PRAGMA user_version`.
//! - A connection handed out has every table and the `String` primitive.

use crate::model::data_class::ClassId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Result of opening or migrating the metadata store.
pub type DbResult<T> = Result<T, DbError>;

/// Failure to bring a metadata store into a usable state.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store was written by a newer build.
    UnsupportedSchemaVersion {
        store_version: u32,
        latest_supported: u32,
    },
    /// One migration step failed; nothing from the batch was kept.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// A seeded primitive class is gone from an already migrated store.
    MissingSeedClass { class_id: ClassId, name: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                store_version,
                latest_supported,
            } => write!(
                f,
                "metadata store is at schema version {store_version}; this build supports up to {latest_supported}"
            ),
            Self::Migration { version, source } => {
                write!(f, "metadata store migration {version} failed: {source}")
            }
            Self::MissingSeedClass { class_id, name } => write!(
                f,
                "metadata store lacks the seeded `{name}` class (id {class_id})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingSeedClass { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
