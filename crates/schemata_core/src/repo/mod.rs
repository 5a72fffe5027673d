//! Repository layer: persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define one storage contract per entity (class, property, relation,
//!   object), matching the operations of the external metadata store.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Write paths normalize and validate names before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Cross-entity existence checks belong to the service layer.

use crate::db::DbError;
use crate::model::data_class::ClassId;
use crate::model::data_object::ObjectId;
use crate::model::data_property::PropertyId;
use crate::model::name::NameValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod class_repo;
pub mod object_repo;
pub mod property_repo;
pub mod relation_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Names the entity a lookup failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Class(ClassId),
    Property(PropertyId),
    Object(ObjectId),
    /// A class looked up by its display name.
    ClassName(String),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(id) => write!(f, "class {id}"),
            Self::Property(id) => write!(f, "property {id}"),
            Self::Object(id) => write!(f, "object {id}"),
            Self::ClassName(name) => write!(f, "class named `{name}`"),
        }
    }
}

/// Repository error for metadata persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NameValidationError),
    Db(DbError),
    NotFound(EntityRef),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<NameValidationError> for RepoError {
    fn from(value: NameValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Fails with `MissingRequiredTable` unless every table exists.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }
    Ok(())
}

/// The four SQLite repositories sharing one connection.
///
/// Each repository is `Copy`, so services can take their own handle.
#[derive(Clone, Copy)]
pub struct SqliteRepositories<'conn> {
    pub classes: class_repo::SqliteClassRepository<'conn>,
    pub properties: property_repo::SqlitePropertyRepository<'conn>,
    pub relations: relation_repo::SqliteRelationRepository<'conn>,
    pub objects: object_repo::SqliteObjectRepository<'conn>,
}

impl<'conn> SqliteRepositories<'conn> {
    /// Builds all repositories, failing if any required table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            classes: class_repo::SqliteClassRepository::try_new(conn)?,
            properties: property_repo::SqlitePropertyRepository::try_new(conn)?,
            relations: relation_repo::SqliteRelationRepository::try_new(conn)?,
            objects: object_repo::SqliteObjectRepository::try_new(conn)?,
        })
    }
}
