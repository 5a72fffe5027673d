//! Data property (typed attribute) model.
//!
//! # Invariants
//! - `type_class_id` must name an existing class when written.
//! - Read paths treat an unresolved `type_class_id` as "type unknown".

use crate::model::data_class::ClassId;
use crate::model::name::{normalize_name, NameValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned property identifier.
pub type PropertyId = i64;

/// Persisted data property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProperty {
    pub id: PropertyId,
    pub name: String,
    /// Class describing the values this property holds.
    pub type_class_id: ClassId,
}

/// User-entered property fields, without id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDraft {
    pub name: String,
    pub type_class_id: ClassId,
}

impl PropertyDraft {
    pub fn new(name: impl Into<String>, type_class_id: ClassId) -> Self {
        Self {
            name: name.into(),
            type_class_id,
        }
    }

    /// Returns a copy with the name normalized.
    pub fn normalized(&self) -> Result<Self, NameValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            type_class_id: self.type_class_id,
        })
    }
}
