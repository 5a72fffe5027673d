//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the registry, relation-graph,
//!   materializer and object-store use cases.
//! - Enforce cross-entity existence rules above the repository layer.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Repository `NotFound` errors surface unchanged as `SchemaError::NotFound`.
//! - Services never hold ambient "currently edited" state; edit context is
//!   passed explicitly (see `edit_session`).

use crate::model::name::NameValidationError;
use crate::repo::{EntityRef, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod class_service;
pub mod edit_session;
pub mod materializer;
pub mod object_service;
pub mod property_service;
pub mod relation_service;

use materializer::SchemaDrift;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Service error shared by registries, relation graph and materializer.
///
/// Any of these surfaced to a caller must block the corresponding save.
#[derive(Debug)]
pub enum SchemaError {
    /// User-entered name is blank or too long.
    Validation(NameValidationError),
    /// A referenced id (or reference text) does not resolve.
    NotFound(EntityRef),
    /// Stored object values no longer line up with the class's properties.
    StaleSchema(SchemaDrift),
    /// Edit session used out of order (not loaded, or already closed).
    InvalidSession(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::StaleSchema(drift) => write!(f, "{drift}"),
            Self::InvalidSession(details) => write!(f, "invalid edit session: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SchemaError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(entity) => Self::NotFound(entity),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NameValidationError> for SchemaError {
    fn from(value: NameValidationError) -> Self {
        Self::Validation(value)
    }
}
