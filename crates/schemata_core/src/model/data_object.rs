//! Data object (class instance) model.
//!
//! # Responsibility
//! - Define the object record, its values, and the tagged value variant.
//!
//! # Invariants
//! - Every `DataValue` names the property it belongs to (`property_id`);
//!   ordering of `values` carries no meaning for pairing.
//! - `object_id`/`DataValue::id` are `None` until the store assigns them.
//! - Values are strings at rest; reference values additionally carry the
//!   resolved target class id when one was found.

use crate::model::data_class::ClassId;
use crate::model::data_property::{DataProperty, PropertyId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned object identifier.
pub type ObjectId = i64;
/// Store-assigned value identifier.
pub type ValueId = i64;

/// Value held by one property of one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyValue {
    /// Plain text for primitive-typed properties.
    Primitive { text: String },
    /// Reference to a user-defined class, as typed by the user.
    #[serde(rename_all = "camelCase")]
    Reference {
        target_id: Option<ClassId>,
        display_text: String,
    },
}

impl PropertyValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Primitive { text: text.into() }
    }

    /// Text form of the value, as shown in an editor.
    pub fn content(&self) -> &str {
        match self {
            Self::Primitive { text } => text,
            Self::Reference { display_text, .. } => display_text,
        }
    }
}

/// One stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    pub id: Option<ValueId>,
    pub property_id: PropertyId,
    pub value: PropertyValue,
    /// Unix epoch milliseconds.
    pub saved_at: i64,
}

impl DataValue {
    /// Builds an unsaved value stamped with the current time.
    pub fn new(property_id: PropertyId, value: PropertyValue) -> Self {
        Self {
            id: None,
            property_id,
            value,
            saved_at: now_epoch_ms(),
        }
    }

    pub fn content(&self) -> &str {
        self.value.content()
    }
}

/// Instance of a data class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub object_id: Option<ObjectId>,
    pub data_class_id: ClassId,
    /// Owned properties of the class at the time the object was built.
    pub properties: Vec<DataProperty>,
    pub values: Vec<DataValue>,
}

impl DataObject {
    /// Returns the value stored for `property_id`, if any.
    pub fn value_for(&self, property_id: PropertyId) -> Option<&DataValue> {
        self.values
            .iter()
            .find(|value| value.property_id == property_id)
    }

    pub fn is_persisted(&self) -> bool {
        self.object_id.is_some()
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` if the clock reads before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(0)
}
