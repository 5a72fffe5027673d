//! Data class (schema node) model.
//!
//! # Responsibility
//! - Define the class record and its kind tag.
//! - Describe the seeded `String` primitive.
//!
//! # Invariants
//! - `id` is store-assigned; drafts never carry one.
//! - Exactly one primitive class is seeded: `String` with id `0`.
//! - Kind tags the core does not recognize are kept as `ClassKind::Unknown`
//!   instead of failing the read.

use crate::model::name::{normalize_name, NameValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned class identifier.
pub type ClassId = i64;

/// Id of the seeded string primitive class.
pub const STRING_PRIMITIVE_CLASS_ID: ClassId = 0;
/// Name of the seeded string primitive class.
pub const STRING_PRIMITIVE_CLASS_NAME: &str = "String";

const USER_DEFINED_TAG: &str = "UserDefinedClass";
const PRIMITIVE_DEFINED_TAG: &str = "PrimitiveDefinedClass";

/// Kind of a data class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    /// Entity type authored by a user.
    #[serde(rename = "UserDefinedClass")]
    UserDefined,
    /// Built-in value type such as `String`.
    #[serde(rename = "PrimitiveDefinedClass")]
    PrimitiveDefined,
    /// Kind tag not recognized by this build.
    #[serde(other)]
    Unknown,
}

impl ClassKind {
    /// Returns the persisted/wire tag, or `None` for `Unknown`.
    pub fn as_tag(self) -> Option<&'static str> {
        match self {
            Self::UserDefined => Some(USER_DEFINED_TAG),
            Self::PrimitiveDefined => Some(PRIMITIVE_DEFINED_TAG),
            Self::Unknown => None,
        }
    }

    /// Parses a persisted/wire tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            USER_DEFINED_TAG => Some(Self::UserDefined),
            PRIMITIVE_DEFINED_TAG => Some(Self::PrimitiveDefined),
            _ => None,
        }
    }
}

/// Persisted data class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataClass {
    pub id: ClassId,
    pub name: String,
    /// Serialized as `type` to match the store's payload naming.
    #[serde(rename = "type")]
    pub kind: ClassKind,
}

impl DataClass {
    /// Builds the in-memory shape of the seeded string primitive.
    pub fn string_primitive() -> Self {
        Self {
            id: STRING_PRIMITIVE_CLASS_ID,
            name: STRING_PRIMITIVE_CLASS_NAME.to_string(),
            kind: ClassKind::PrimitiveDefined,
        }
    }
}

/// User-entered class fields, without id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDraft {
    pub name: String,
    pub kind: ClassKind,
}

impl ClassDraft {
    /// Draft for a new user-defined class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::UserDefined,
        }
    }

    /// Draft carrying an explicit kind, used by updates.
    pub fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns a copy with the name normalized.
    pub fn normalized(&self) -> Result<Self, NameValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            kind: self.kind,
        })
    }
}
