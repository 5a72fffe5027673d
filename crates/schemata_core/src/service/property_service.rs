//! Property registry use-case service.
//!
//! # Invariants
//! - A property's `type_class_id` must name an existing class when written.
//! - `update` reports a missing property before a missing type class.

use crate::model::data_class::ClassId;
use crate::model::data_property::{DataProperty, PropertyDraft, PropertyId};
use crate::repo::class_repo::ClassRepository;
use crate::repo::property_repo::PropertyRepository;
use crate::repo::EntityRef;
use crate::service::{SchemaError, SchemaResult};
use log::info;

/// Registry of data properties.
pub struct PropertyRegistry<P: PropertyRepository, C: ClassRepository> {
    properties: P,
    classes: C,
}

impl<P: PropertyRepository, C: ClassRepository> PropertyRegistry<P, C> {
    pub fn new(properties: P, classes: C) -> Self {
        Self {
            properties,
            classes,
        }
    }

    /// Lists every property in store order.
    pub fn list_all(&self) -> SchemaResult<Vec<DataProperty>> {
        Ok(self.properties.list_properties()?)
    }

    pub fn get(&self, id: PropertyId) -> SchemaResult<Option<DataProperty>> {
        Ok(self.properties.get_property(id)?)
    }

    /// Creates a property typed by `draft.type_class_id`.
    ///
    /// # Errors
    /// - `Validation` when the name is blank after trimming.
    /// - `NotFound(Class)` when the type class does not exist.
    pub fn create(&self, draft: &PropertyDraft) -> SchemaResult<DataProperty> {
        let draft = draft.normalized()?;
        self.ensure_type_class(draft.type_class_id)?;
        let created = self.properties.create_property(&draft)?;
        info!(
            "event=property_create module=registry status=ok property_id={} type_class_id={}",
            created.id, created.type_class_id
        );
        Ok(created)
    }

    /// Replaces name and type of an existing property.
    ///
    /// # Errors
    /// - `NotFound(Property)` when `id` does not exist.
    /// - `Validation` when the name is blank after trimming.
    /// - `NotFound(Class)` when the type class does not exist.
    pub fn update(&self, id: PropertyId, draft: &PropertyDraft) -> SchemaResult<DataProperty> {
        if self.properties.get_property(id)?.is_none() {
            return Err(SchemaError::NotFound(EntityRef::Property(id)));
        }
        let draft = draft.normalized()?;
        self.ensure_type_class(draft.type_class_id)?;
        let updated = self.properties.update_property(id, &draft)?;
        info!("event=property_update module=registry status=ok property_id={id}");
        Ok(updated)
    }

    fn ensure_type_class(&self, type_class_id: ClassId) -> SchemaResult<()> {
        match self.classes.get_class(type_class_id)? {
            Some(_) => Ok(()),
            None => Err(SchemaError::NotFound(EntityRef::Class(type_class_id))),
        }
    }
}
