//! Class registry use-case service.
//!
//! # Invariants
//! - `create` always yields a `UserDefined` class; primitives are seed data.
//! - Names are normalized by the repository before persistence.

use crate::model::data_class::{ClassDraft, ClassId, ClassKind, DataClass};
use crate::model::name::normalize_name;
use crate::repo::class_repo::ClassRepository;
use crate::service::SchemaResult;
use log::info;

/// Registry of data classes.
pub struct ClassRegistry<C: ClassRepository> {
    repo: C,
}

impl<C: ClassRepository> ClassRegistry<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Lists every class in store order.
    pub fn list_all(&self) -> SchemaResult<Vec<DataClass>> {
        Ok(self.repo.list_classes()?)
    }

    pub fn get(&self, id: ClassId) -> SchemaResult<Option<DataClass>> {
        Ok(self.repo.get_class(id)?)
    }

    /// Finds the first class whose name equals `name` after normalization.
    ///
    /// Blank input matches nothing.
    pub fn find_by_name(&self, name: &str) -> SchemaResult<Option<DataClass>> {
        let Ok(wanted) = normalize_name(name) else {
            return Ok(None);
        };
        Ok(self
            .repo
            .list_classes()?
            .into_iter()
            .find(|class| class.name == wanted))
    }

    /// Creates a user-defined class from `draft`.
    ///
    /// The draft's kind is ignored.
    ///
    /// # Errors
    /// - `Validation` when the name is blank after trimming.
    pub fn create(&self, draft: &ClassDraft) -> SchemaResult<DataClass> {
        let draft = ClassDraft::with_kind(draft.name.as_str(), ClassKind::UserDefined);
        let created = self.repo.create_class(&draft)?;
        info!(
            "event=class_create module=registry status=ok class_id={}",
            created.id
        );
        Ok(created)
    }

    /// Renames (and optionally re-kinds) an existing class.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `Validation` when the name is blank after trimming.
    pub fn update(&self, id: ClassId, draft: &ClassDraft) -> SchemaResult<DataClass> {
        let updated = self.repo.update_class(id, draft)?;
        info!("event=class_update module=registry status=ok class_id={id}");
        Ok(updated)
    }
}
