//! Object materializer: objects to editable fields and back.
//!
//! # Responsibility
//! - Build the editable field set for a new or existing object from the
//!   owned properties of its class.
//! - Rebuild a persist-ready object draft from edited field values.
//!
//! # Invariants
//! - Owned properties are resolved once per call, before any field is built.
//! - A property owned twice through duplicate edges yields one field.
//! - Values pair with properties by property id unless the legacy positional
//!   alignment is configured.
//! - Properties whose type cannot be rendered get no field; they are listed
//!   in `FieldSet::unsupported` instead.
//! - Schema drift between a stored object and its class is always reported.
//!   It is judged by property id: a stored value whose property the class no
//!   longer owns, or an editable owned property with no stored value.
//!   Unsupported properties never count, since they are never written.

use crate::model::data_class::{ClassId, DataClass};
use crate::model::data_object::{DataObject, DataValue, ObjectId, PropertyValue};
use crate::model::data_property::{DataProperty, PropertyId};
use crate::model::name::normalize_name;
use crate::model::type_catalog::{resolve_type, PrimitiveKind, TypeResolution, UnsupportedReason};
use crate::repo::class_repo::ClassRepository;
use crate::repo::property_repo::PropertyRepository;
use crate::repo::relation_repo::RelationRepository;
use crate::repo::EntityRef;
use crate::service::relation_service::RelationGraph;
use crate::service::{SchemaError, SchemaResult};
use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};

/// How stored values are paired with owned properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueAlignment {
    /// Pair by `DataValue::property_id`.
    ByPropertyId,
    /// Pair `values[i]` with the i-th owned property. Misaligns silently
    /// after schema changes; kept for stores written that way.
    Positional,
}

/// What to do with reference text that names no class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Reject with `NotFound(ClassName)`.
    Strict,
    /// Keep the raw text with no target id.
    Lenient,
}

/// Materializer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializerConfig {
    pub alignment: ValueAlignment,
    pub reference_policy: ReferencePolicy,
    /// Fail `to_editable_fields` with `StaleSchema` instead of only
    /// reporting drift.
    pub reject_stale_objects: bool,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            alignment: ValueAlignment::ByPropertyId,
            reference_policy: ReferencePolicy::Strict,
            reject_stale_objects: false,
        }
    }
}

impl MaterializerConfig {
    /// Positional pairing and unchecked reference text.
    pub fn legacy() -> Self {
        Self {
            alignment: ValueAlignment::Positional,
            reference_policy: ReferencePolicy::Lenient,
            reject_stale_objects: false,
        }
    }

    pub fn with_alignment(mut self, alignment: ValueAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_reference_policy(mut self, reference_policy: ReferencePolicy) -> Self {
        self.reference_policy = reference_policy;
        self
    }

    pub fn rejecting_stale_objects(mut self) -> Self {
        self.reject_stale_objects = true;
        self
    }
}

/// Which class/object a field set was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditContext {
    pub class_id: ClassId,
    /// `None` when editing a new object.
    pub object_id: Option<ObjectId>,
}

/// Selectable entry of a reference picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOption {
    pub class_id: ClassId,
    pub label: String,
}

/// Editor to render for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    /// Multi-line free text.
    Text,
    /// Autocomplete over known classes; commits whatever text was typed.
    ReferencePicker { options: Vec<ClassOption> },
}

/// One editable slot, keyed by property id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableField {
    pub property_id: PropertyId,
    pub label: String,
    pub editor: EditorKind,
    pub initial_value: String,
}

/// Owned property left without an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedProperty {
    pub property: DataProperty,
    pub reason: UnsupportedReason,
}

/// Mismatch between a stored object's values and its class's current
/// owned properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDrift {
    pub class_id: ClassId,
    pub object_id: Option<ObjectId>,
    /// Stored values whose property is no longer owned by the class.
    pub unowned_property_ids: Vec<PropertyId>,
    /// Editable owned properties the object has no value for.
    pub missing_property_ids: Vec<PropertyId>,
}

impl Display for SchemaDrift {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let object = match self.object_id {
            Some(id) => id.to_string(),
            None => "new".to_string(),
        };
        write!(
            f,
            "object {object} of class {} no longer matches its class",
            self.class_id
        )?;
        if !self.unowned_property_ids.is_empty() {
            write!(f, "; unowned property ids {:?}", self.unowned_property_ids)?;
        }
        if !self.missing_property_ids.is_empty() {
            write!(f, "; no value for property ids {:?}", self.missing_property_ids)?;
        }
        Ok(())
    }
}

/// Editable view of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    pub context: EditContext,
    /// Owned properties the fields were built from; pass back to
    /// `from_editable_fields` unchanged.
    pub properties: Vec<DataProperty>,
    pub fields: Vec<EditableField>,
    pub unsupported: Vec<UnsupportedProperty>,
    pub schema_drift: Option<SchemaDrift>,
}

impl FieldSet {
    pub fn field(&self, property_id: PropertyId) -> Option<&EditableField> {
        self.fields
            .iter()
            .find(|field| field.property_id == property_id)
    }

    /// Initial values keyed by property id.
    pub fn as_edit_map(&self) -> BTreeMap<PropertyId, String> {
        self.fields
            .iter()
            .map(|field| (field.property_id, field.initial_value.clone()))
            .collect()
    }

    /// Fails with `StaleSchema` when drift was detected.
    pub fn ensure_current(&self) -> SchemaResult<()> {
        match &self.schema_drift {
            Some(drift) => Err(SchemaError::StaleSchema(drift.clone())),
            None => Ok(()),
        }
    }
}

/// Converts between stored objects and editable field sets.
pub struct ObjectMaterializer<R: RelationRepository, C: ClassRepository, P: PropertyRepository> {
    graph: RelationGraph<R, C, P>,
    config: MaterializerConfig,
}

impl<R, C, P> ObjectMaterializer<R, C, P>
where
    R: RelationRepository,
    C: ClassRepository,
    P: PropertyRepository,
{
    pub fn new(graph: RelationGraph<R, C, P>, config: MaterializerConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> MaterializerConfig {
        self.config
    }

    pub fn graph(&self) -> &RelationGraph<R, C, P> {
        &self.graph
    }

    /// Builds the field set for a new object of `class_id`, or for
    /// `existing` (whose own class wins over `class_id`).
    ///
    /// # Errors
    /// - `NotFound(Class)` when the effective class does not exist.
    /// - `StaleSchema` when drift is found and `reject_stale_objects` is set.
    pub fn to_editable_fields(
        &self,
        class_id: ClassId,
        existing: Option<&DataObject>,
    ) -> SchemaResult<FieldSet> {
        let context = EditContext {
            class_id: existing.map_or(class_id, |object| object.data_class_id),
            object_id: existing.and_then(|object| object.object_id),
        };

        let classes = self.graph.classes().list_classes()?;
        if !classes.iter().any(|class| class.id == context.class_id) {
            return Err(SchemaError::NotFound(EntityRef::Class(context.class_id)));
        }

        let owned = distinct_by_id(self.graph.owned_properties(context.class_id)?);

        let mut fields = Vec::with_capacity(owned.len());
        let mut unsupported = Vec::new();
        for (index, property) in owned.iter().enumerate() {
            let editor = match resolve_type(property.type_class_id, &classes) {
                TypeResolution::Primitive(PrimitiveKind::String) => EditorKind::Text,
                TypeResolution::UserDefined(_) => EditorKind::ReferencePicker {
                    options: class_options(&classes),
                },
                TypeResolution::Unsupported(reason) => {
                    debug!(
                        "event=field_skipped module=materializer status=skipped property_id={} reason={reason:?}",
                        property.id
                    );
                    unsupported.push(UnsupportedProperty {
                        property: property.clone(),
                        reason,
                    });
                    continue;
                }
            };

            fields.push(EditableField {
                property_id: property.id,
                label: property.name.clone(),
                editor,
                initial_value: self.initial_value(existing, index, property.id),
            });
        }

        let schema_drift =
            existing.and_then(|object| detect_drift(context, object, &owned, &fields));
        if let Some(drift) = &schema_drift {
            warn!(
                "event=schema_drift module=materializer status=warn class_id={} unowned={:?} missing={:?}",
                drift.class_id, drift.unowned_property_ids, drift.missing_property_ids
            );
            if self.config.reject_stale_objects {
                return Err(SchemaError::StaleSchema(drift.clone()));
            }
        }

        Ok(FieldSet {
            context,
            properties: owned,
            fields,
            unsupported,
            schema_drift,
        })
    }

    /// Builds an unsaved object of `class_id` from edited values.
    ///
    /// `properties` must be the list returned in `FieldSet::properties`.
    /// Values are emitted in `properties` order, one per key of `fields`.
    ///
    /// # Errors
    /// - `NotFound(Class)` when `class_id` does not exist.
    /// - `NotFound(Property)` when `fields` holds a key outside `properties`,
    ///   or a key for a property whose type has no editor.
    /// - `NotFound(ClassName)` for unresolvable reference text under
    ///   `ReferencePolicy::Strict`.
    pub fn from_editable_fields(
        &self,
        class_id: ClassId,
        properties: &[DataProperty],
        fields: &BTreeMap<PropertyId, String>,
    ) -> SchemaResult<DataObject> {
        let classes = self.graph.classes().list_classes()?;
        if !classes.iter().any(|class| class.id == class_id) {
            return Err(SchemaError::NotFound(EntityRef::Class(class_id)));
        }

        if let Some(stray) = fields
            .keys()
            .find(|key| !properties.iter().any(|property| property.id == **key))
        {
            return Err(SchemaError::NotFound(EntityRef::Property(*stray)));
        }

        let mut seen = HashSet::new();
        let mut values = Vec::with_capacity(fields.len());
        for property in properties {
            if !seen.insert(property.id) {
                continue;
            }
            let Some(text) = fields.get(&property.id) else {
                continue;
            };
            let value = match resolve_type(property.type_class_id, &classes) {
                TypeResolution::Primitive(PrimitiveKind::String) => PropertyValue::text(text.as_str()),
                TypeResolution::UserDefined(_) => self.reference_value(text, &classes)?,
                TypeResolution::Unsupported(_) => {
                    return Err(SchemaError::NotFound(EntityRef::Property(property.id)));
                }
            };
            values.push(DataValue::new(property.id, value));
        }

        Ok(DataObject {
            object_id: None,
            data_class_id: class_id,
            properties: properties.to_vec(),
            values,
        })
    }

    /// `from_editable_fields` for the class and properties of `field_set`.
    pub fn from_field_set(
        &self,
        field_set: &FieldSet,
        fields: &BTreeMap<PropertyId, String>,
    ) -> SchemaResult<DataObject> {
        self.from_editable_fields(field_set.context.class_id, &field_set.properties, fields)
    }

    fn initial_value(
        &self,
        existing: Option<&DataObject>,
        index: usize,
        property_id: PropertyId,
    ) -> String {
        let Some(object) = existing else {
            return String::new();
        };
        let stored = match self.config.alignment {
            ValueAlignment::ByPropertyId => object.value_for(property_id),
            ValueAlignment::Positional => object.values.get(index),
        };
        stored
            .map(|value| value.content().to_string())
            .unwrap_or_default()
    }

    fn reference_value(&self, text: &str, classes: &[DataClass]) -> SchemaResult<PropertyValue> {
        let target_id = match normalize_name(text) {
            Ok(wanted) => classes
                .iter()
                .find(|class| class.name == wanted)
                .map(|class| class.id),
            Err(_) => None,
        };

        let blank = text.trim().is_empty();
        if target_id.is_none() && !blank && self.config.reference_policy == ReferencePolicy::Strict
        {
            return Err(SchemaError::NotFound(EntityRef::ClassName(
                text.trim().to_string(),
            )));
        }

        Ok(PropertyValue::Reference {
            target_id,
            display_text: text.to_string(),
        })
    }
}

/// Keeps the first occurrence of each property id.
fn distinct_by_id(properties: Vec<DataProperty>) -> Vec<DataProperty> {
    let mut seen = HashSet::new();
    properties
        .into_iter()
        .filter(|property| seen.insert(property.id))
        .collect()
}

fn class_options(classes: &[DataClass]) -> Vec<ClassOption> {
    classes
        .iter()
        .map(|class| ClassOption {
            class_id: class.id,
            label: class.name.clone(),
        })
        .collect()
}

fn detect_drift(
    context: EditContext,
    object: &DataObject,
    owned: &[DataProperty],
    fields: &[EditableField],
) -> Option<SchemaDrift> {
    let owned_ids: HashSet<PropertyId> = owned.iter().map(|property| property.id).collect();
    let stored_ids: HashSet<PropertyId> =
        object.values.iter().map(|value| value.property_id).collect();

    let mut seen = HashSet::new();
    let unowned_property_ids: Vec<PropertyId> = object
        .values
        .iter()
        .map(|value| value.property_id)
        .filter(|property_id| !owned_ids.contains(property_id) && seen.insert(*property_id))
        .collect();
    let missing_property_ids: Vec<PropertyId> = fields
        .iter()
        .map(|field| field.property_id)
        .filter(|property_id| !stored_ids.contains(property_id))
        .collect();

    if unowned_property_ids.is_empty() && missing_property_ids.is_empty() {
        return None;
    }

    Some(SchemaDrift {
        class_id: context.class_id,
        object_id: context.object_id,
        unowned_property_ids,
        missing_property_ids,
    })
}
