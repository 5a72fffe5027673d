//! Object store use cases.
//!
//! # Responsibility
//! - Persist object drafts built by the materializer.
//! - Read stored objects back for editing.
//!
//! # Invariants
//! - A draft is only persisted when its class exists.
//! - Saving always creates a new object; ids on the draft are ignored.

use crate::model::data_class::ClassId;
use crate::model::data_object::{DataObject, ObjectId};
use crate::repo::class_repo::ClassRepository;
use crate::repo::object_repo::ObjectRepository;
use crate::repo::EntityRef;
use crate::service::{SchemaError, SchemaResult};
use log::info;

/// Use-case service for stored objects.
pub struct ObjectService<O: ObjectRepository, C: ClassRepository> {
    objects: O,
    classes: C,
}

impl<O: ObjectRepository, C: ClassRepository> ObjectService<O, C> {
    pub fn new(objects: O, classes: C) -> Self {
        Self { objects, classes }
    }

    /// Persists `draft` and returns it with store-assigned ids.
    ///
    /// # Errors
    /// - `NotFound(Class)` when the draft's class does not exist.
    pub fn create_object(&self, draft: &DataObject) -> SchemaResult<DataObject> {
        if self.classes.get_class(draft.data_class_id)?.is_none() {
            return Err(SchemaError::NotFound(EntityRef::Class(draft.data_class_id)));
        }

        let saved = self.objects.create_object(draft)?;
        info!(
            "event=object_create module=object_store status=ok object_id={:?} class_id={} values={}",
            saved.object_id,
            saved.data_class_id,
            saved.values.len()
        );
        Ok(saved)
    }

    pub fn list_objects(&self) -> SchemaResult<Vec<DataObject>> {
        Ok(self.objects.list_objects()?)
    }

    pub fn list_objects_for_class(&self, class_id: ClassId) -> SchemaResult<Vec<DataObject>> {
        Ok(self.objects.list_objects_for_class(class_id)?)
    }

    pub fn get_object(&self, id: ObjectId) -> SchemaResult<Option<DataObject>> {
        Ok(self.objects.get_object(id)?)
    }
}
