//! Explicit edit context for creating or editing one object.
//!
//! # Responsibility
//! - Track which class/object is being edited and the user's draft values.
//! - Discard field sets built for a context the user has since left.
//! - Commit the draft through the materializer and the object store.
//!
//! # Invariants
//! - Draft keys are always property ids of the adopted field set.
//! - A closed session adopts nothing and commits nothing.
//! - Changing the selection drops the adopted field set and the draft.

use crate::model::data_class::ClassId;
use crate::model::data_object::DataObject;
use crate::model::data_property::PropertyId;
use crate::repo::class_repo::ClassRepository;
use crate::repo::object_repo::ObjectRepository;
use crate::repo::property_repo::PropertyRepository;
use crate::repo::relation_repo::RelationRepository;
use crate::repo::EntityRef;
use crate::service::materializer::{EditContext, FieldSet, ObjectMaterializer};
use crate::service::object_service::ObjectService;
use crate::service::{SchemaError, SchemaResult};
use log::{debug, info};
use std::collections::BTreeMap;

/// Draft state of one create/edit flow.
#[derive(Debug, Clone)]
pub struct EditSession {
    context: EditContext,
    existing: Option<DataObject>,
    field_set: Option<FieldSet>,
    edits: BTreeMap<PropertyId, String>,
    closed: bool,
}

impl EditSession {
    /// Session for a new object of `class_id`.
    pub fn for_new_object(class_id: ClassId) -> Self {
        Self {
            context: EditContext {
                class_id,
                object_id: None,
            },
            existing: None,
            field_set: None,
            edits: BTreeMap::new(),
            closed: false,
        }
    }

    /// Session editing a copy of `object`.
    pub fn for_existing_object(object: &DataObject) -> Self {
        let mut session = Self::for_new_object(object.data_class_id);
        session.context.object_id = object.object_id;
        session.existing = Some(object.clone());
        session
    }

    pub fn context(&self) -> EditContext {
        self.context
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Switches to creating a new object of `class_id`.
    pub fn select_class(&mut self, class_id: ClassId) {
        *self = Self::for_new_object(class_id);
    }

    /// Switches to editing `object`.
    pub fn select_object(&mut self, object: &DataObject) {
        *self = Self::for_existing_object(object);
    }

    /// Builds the field set for the current context without adopting it.
    pub fn request<R, C, P>(
        &self,
        materializer: &ObjectMaterializer<R, C, P>,
    ) -> SchemaResult<FieldSet>
    where
        R: RelationRepository,
        C: ClassRepository,
        P: PropertyRepository,
    {
        self.ensure_open()?;
        materializer.to_editable_fields(self.context.class_id, self.existing.as_ref())
    }

    /// Builds and adopts the field set for the current context.
    pub fn load<R, C, P>(
        &mut self,
        materializer: &ObjectMaterializer<R, C, P>,
    ) -> SchemaResult<&FieldSet>
    where
        R: RelationRepository,
        C: ClassRepository,
        P: PropertyRepository,
    {
        let field_set = self.request(materializer)?;
        self.adopt(field_set);
        self.field_set
            .as_ref()
            .ok_or(SchemaError::InvalidSession("field set was not adopted"))
    }

    /// Adopts `field_set` if it was built for the active context.
    ///
    /// Returns `false` (and drops the field set) for a stale context or a
    /// closed session.
    pub fn accept(&mut self, field_set: FieldSet) -> bool {
        if self.closed || field_set.context != self.context {
            debug!(
                "event=field_set_discard module=edit_session status=stale class_id={} active_class_id={}",
                field_set.context.class_id, self.context.class_id
            );
            return false;
        }
        self.adopt(field_set);
        true
    }

    pub fn field_set(&self) -> Option<&FieldSet> {
        self.field_set.as_ref()
    }

    /// Current draft, keyed by property id.
    pub fn edits(&self) -> &BTreeMap<PropertyId, String> {
        &self.edits
    }

    /// Replaces the draft value of one field.
    ///
    /// # Errors
    /// - `InvalidSession` before a field set is adopted or after close.
    /// - `NotFound(Property)` when `property_id` has no field.
    pub fn set_value(&mut self, property_id: PropertyId, text: impl Into<String>) -> SchemaResult<()> {
        self.ensure_open()?;
        let field_set = self
            .field_set
            .as_ref()
            .ok_or(SchemaError::InvalidSession("no field set loaded"))?;
        if field_set.field(property_id).is_none() {
            return Err(SchemaError::NotFound(EntityRef::Property(property_id)));
        }
        self.edits.insert(property_id, text.into());
        Ok(())
    }

    /// Builds the persist-ready object from the draft without saving it.
    pub fn build_draft<R, C, P>(
        &self,
        materializer: &ObjectMaterializer<R, C, P>,
    ) -> SchemaResult<DataObject>
    where
        R: RelationRepository,
        C: ClassRepository,
        P: PropertyRepository,
    {
        self.ensure_open()?;
        let field_set = self
            .field_set
            .as_ref()
            .ok_or(SchemaError::InvalidSession("no field set loaded"))?;
        materializer.from_field_set(field_set, &self.edits)
    }

    /// Persists the draft as a new object and closes the session.
    ///
    /// Any error leaves the session open with its draft intact.
    pub fn commit<R, C, P, O, S>(
        &mut self,
        materializer: &ObjectMaterializer<R, C, P>,
        store: &ObjectService<O, S>,
    ) -> SchemaResult<DataObject>
    where
        R: RelationRepository,
        C: ClassRepository,
        P: PropertyRepository,
        O: ObjectRepository,
        S: ClassRepository,
    {
        let draft = self.build_draft(materializer)?;
        let saved = store.create_object(&draft)?;
        info!(
            "event=edit_commit module=edit_session status=ok class_id={} edited_object={:?} saved_object={:?}",
            self.context.class_id, self.context.object_id, saved.object_id
        );
        self.close();
        Ok(saved)
    }

    /// Drops the draft; the session accepts nothing afterwards.
    pub fn close(&mut self) {
        self.field_set = None;
        self.edits.clear();
        self.existing = None;
        self.closed = true;
    }

    fn adopt(&mut self, field_set: FieldSet) {
        self.edits = field_set.as_edit_map();
        self.field_set = Some(field_set);
    }

    fn ensure_open(&self) -> SchemaResult<()> {
        if self.closed {
            return Err(SchemaError::InvalidSession("session is closed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EditSession;
    use crate::model::data_object::{DataObject, DataValue, PropertyValue};
    use crate::service::materializer::{EditContext, FieldSet};

    fn empty_field_set(class_id: i64, object_id: Option<i64>) -> FieldSet {
        FieldSet {
            context: EditContext {
                class_id,
                object_id,
            },
            properties: Vec::new(),
            fields: Vec::new(),
            unsupported: Vec::new(),
            schema_drift: None,
        }
    }

    #[test]
    fn stale_field_set_is_discarded_after_selection_change() {
        let mut session = EditSession::for_new_object(1);
        let stale = empty_field_set(1, None);
        session.select_class(2);

        assert!(!session.accept(stale));
        assert!(session.field_set().is_none());
        assert!(session.accept(empty_field_set(2, None)));
    }

    #[test]
    fn existing_object_context_uses_object_ids() {
        let object = DataObject {
            object_id: Some(9),
            data_class_id: 4,
            properties: Vec::new(),
            values: vec![DataValue::new(1, PropertyValue::text("x"))],
        };
        let session = EditSession::for_existing_object(&object);

        assert_eq!(session.context().class_id, 4);
        assert_eq!(session.context().object_id, Some(9));
    }

    #[test]
    fn closed_session_accepts_nothing() {
        let mut session = EditSession::for_new_object(1);
        session.close();

        assert!(session.is_closed());
        assert!(!session.accept(empty_field_set(1, None)));
        assert!(session.set_value(1, "x").is_err());
    }
}
