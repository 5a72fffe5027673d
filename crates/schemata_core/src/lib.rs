//! Metadata core for user-authored data classes.
//!
//! Users define classes, properties typed by other classes, and which class
//! owns which property; objects of those classes are edited through field
//! sets derived from that schema and stored as one value per property.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CoreConfig, StoreLocation};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::data_class::{
    ClassDraft, ClassId, ClassKind, DataClass, STRING_PRIMITIVE_CLASS_ID,
    STRING_PRIMITIVE_CLASS_NAME,
};
pub use model::data_object::{DataObject, DataValue, ObjectId, PropertyValue, ValueId};
pub use model::data_property::{DataProperty, PropertyDraft, PropertyId};
pub use model::name::{normalize_name, NameValidationError};
pub use model::relation::{ClassPropertyRelation, RelationId};
pub use model::type_catalog::{PrimitiveKind, TypeResolution, UnsupportedReason};
pub use repo::{EntityRef, RepoError, RepoResult, SqliteRepositories};
pub use service::class_service::ClassRegistry;
pub use service::edit_session::EditSession;
pub use service::materializer::{
    EditContext, EditableField, EditorKind, FieldSet, MaterializerConfig, ObjectMaterializer,
    ReferencePolicy, SchemaDrift, ValueAlignment,
};
pub use service::object_service::ObjectService;
pub use service::property_service::PropertyRegistry;
pub use service::relation_service::{OwnedProperties, RelationGraph};
pub use service::{SchemaError, SchemaResult};

/// Minimal health-check API for embedders.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
