//! Object repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist an object together with its property snapshot and values.
//! - Read objects back with values in their stored order.
//!
//! # Invariants
//! - An object and all of its rows are written in one transaction.
//! - Store-assigned ids replace the `None` ids of a draft on write.
//! - Unknown value kinds in storage are rejected, not masked.

use crate::model::data_class::ClassId;
use crate::model::data_object::{DataObject, DataValue, ObjectId, PropertyValue};
use crate::model::data_property::DataProperty;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const VALUE_KIND_PRIMITIVE: &str = "primitive";
const VALUE_KIND_REFERENCE: &str = "reference";

/// Repository interface for data objects.
pub trait ObjectRepository {
    /// Persists a draft and returns it with store-assigned ids.
    fn create_object(&self, draft: &DataObject) -> RepoResult<DataObject>;
    fn get_object(&self, id: ObjectId) -> RepoResult<Option<DataObject>>;
    fn list_objects(&self) -> RepoResult<Vec<DataObject>>;
    fn list_objects_for_class(&self, class_id: ClassId) -> RepoResult<Vec<DataObject>>;
}

/// SQLite-backed object repository.
#[derive(Clone, Copy)]
pub struct SqliteObjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &["data_objects", "data_object_properties", "data_values"],
        )?;
        Ok(Self { conn })
    }

    fn load_object_rows(&self, class_id: Option<ClassId>) -> RepoResult<Vec<(ObjectId, ClassId)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data_class_id
             FROM data_objects
             WHERE (?1 IS NULL OR data_class_id = ?1)
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([class_id])?;
        let mut heads = Vec::new();
        while let Some(row) = rows.next()? {
            heads.push((row.get("id")?, row.get("data_class_id")?));
        }
        Ok(heads)
    }

    fn assemble(&self, object_id: ObjectId, data_class_id: ClassId) -> RepoResult<DataObject> {
        Ok(DataObject {
            object_id: Some(object_id),
            data_class_id,
            properties: load_property_snapshot(self.conn, object_id)?,
            values: load_values(self.conn, object_id)?,
        })
    }
}

impl ObjectRepository for SqliteObjectRepository<'_> {
    fn create_object(&self, draft: &DataObject) -> RepoResult<DataObject> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO data_objects (data_class_id) VALUES (?1);",
            [draft.data_class_id],
        )?;
        let object_id = tx.last_insert_rowid();

        for (position, property) in draft.properties.iter().enumerate() {
            tx.execute(
                "INSERT INTO data_object_properties (
                    object_id,
                    position,
                    property_id,
                    name,
                    type_class_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    object_id,
                    position_to_db(position)?,
                    property.id,
                    property.name.as_str(),
                    property.type_class_id,
                ],
            )?;
        }

        let mut values = Vec::with_capacity(draft.values.len());
        for (position, value) in draft.values.iter().enumerate() {
            let (kind, reference_class_id) = match &value.value {
                PropertyValue::Primitive { .. } => (VALUE_KIND_PRIMITIVE, None),
                PropertyValue::Reference { target_id, .. } => (VALUE_KIND_REFERENCE, *target_id),
            };
            tx.execute(
                "INSERT INTO data_values (
                    object_id,
                    position,
                    property_id,
                    kind,
                    content,
                    reference_class_id,
                    saved_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    object_id,
                    position_to_db(position)?,
                    value.property_id,
                    kind,
                    value.content(),
                    reference_class_id,
                    value.saved_at,
                ],
            )?;
            values.push(DataValue {
                id: Some(tx.last_insert_rowid()),
                ..value.clone()
            });
        }

        tx.commit()?;

        Ok(DataObject {
            object_id: Some(object_id),
            data_class_id: draft.data_class_id,
            properties: draft.properties.clone(),
            values,
        })
    }

    fn get_object(&self, id: ObjectId) -> RepoResult<Option<DataObject>> {
        let class_id: Option<ClassId> = {
            let mut stmt = self
                .conn
                .prepare("SELECT data_class_id FROM data_objects WHERE id = ?1;")?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Some(row.get(0)?),
                None => None,
            }
        };

        match class_id {
            Some(class_id) => Ok(Some(self.assemble(id, class_id)?)),
            None => Ok(None),
        }
    }

    fn list_objects(&self) -> RepoResult<Vec<DataObject>> {
        self.load_object_rows(None)?
            .into_iter()
            .map(|(object_id, class_id)| self.assemble(object_id, class_id))
            .collect()
    }

    fn list_objects_for_class(&self, class_id: ClassId) -> RepoResult<Vec<DataObject>> {
        self.load_object_rows(Some(class_id))?
            .into_iter()
            .map(|(object_id, class_id)| self.assemble(object_id, class_id))
            .collect()
    }
}

fn load_property_snapshot(conn: &Connection, object_id: ObjectId) -> RepoResult<Vec<DataProperty>> {
    let mut stmt = conn.prepare(
        "SELECT property_id, name, type_class_id
         FROM data_object_properties
         WHERE object_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([object_id])?;
    let mut properties = Vec::new();
    while let Some(row) = rows.next()? {
        properties.push(DataProperty {
            id: row.get("property_id")?,
            name: row.get("name")?,
            type_class_id: row.get("type_class_id")?,
        });
    }
    Ok(properties)
}

fn load_values(conn: &Connection, object_id: ObjectId) -> RepoResult<Vec<DataValue>> {
    let mut stmt = conn.prepare(
        "SELECT id, property_id, kind, content, reference_class_id, saved_at
         FROM data_values
         WHERE object_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([object_id])?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(parse_value_row(row)?);
    }
    Ok(values)
}

fn parse_value_row(row: &Row<'_>) -> RepoResult<DataValue> {
    let kind: String = row.get("kind")?;
    let content: String = row.get("content")?;
    let value = match kind.as_str() {
        VALUE_KIND_PRIMITIVE => PropertyValue::Primitive { text: content },
        VALUE_KIND_REFERENCE => PropertyValue::Reference {
            target_id: row.get("reference_class_id")?,
            display_text: content,
        },
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid value kind `{other}` in data_values.kind"
            )));
        }
    };

    Ok(DataValue {
        id: Some(row.get("id")?),
        property_id: row.get("property_id")?,
        value,
        saved_at: row.get("saved_at")?,
    })
}

fn position_to_db(position: usize) -> RepoResult<i64> {
    i64::try_from(position)
        .map_err(|_| RepoError::InvalidData(format!("position {position} exceeds i64 range")))
}
