//! Property repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is insertion order (`id ASC`).
//! - `type_class_id` is stored as given; resolving it is the caller's job.

use crate::model::data_property::{DataProperty, PropertyDraft, PropertyId};
use crate::repo::{ensure_tables, EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PROPERTY_SELECT_SQL: &str = "SELECT id, name, type_class_id FROM data_properties";

/// Repository interface for data properties.
pub trait PropertyRepository {
    fn list_properties(&self) -> RepoResult<Vec<DataProperty>>;
    fn get_property(&self, id: PropertyId) -> RepoResult<Option<DataProperty>>;
    fn create_property(&self, draft: &PropertyDraft) -> RepoResult<DataProperty>;
    fn update_property(&self, id: PropertyId, draft: &PropertyDraft) -> RepoResult<DataProperty>;
}

/// SQLite-backed property repository.
#[derive(Clone, Copy)]
pub struct SqlitePropertyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePropertyRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["data_properties"])?;
        Ok(Self { conn })
    }
}

impl PropertyRepository for SqlitePropertyRepository<'_> {
    fn list_properties(&self) -> RepoResult<Vec<DataProperty>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROPERTY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut properties = Vec::new();
        while let Some(row) = rows.next()? {
            properties.push(parse_property_row(row)?);
        }
        Ok(properties)
    }

    fn get_property(&self, id: PropertyId) -> RepoResult<Option<DataProperty>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROPERTY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_property_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_property(&self, draft: &PropertyDraft) -> RepoResult<DataProperty> {
        let draft = draft.normalized()?;
        self.conn.execute(
            "INSERT INTO data_properties (name, type_class_id) VALUES (?1, ?2);",
            params![draft.name.as_str(), draft.type_class_id],
        )?;

        Ok(DataProperty {
            id: self.conn.last_insert_rowid(),
            name: draft.name,
            type_class_id: draft.type_class_id,
        })
    }

    fn update_property(&self, id: PropertyId, draft: &PropertyDraft) -> RepoResult<DataProperty> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE data_properties
             SET
                name = ?2,
                type_class_id = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, draft.name.as_str(), draft.type_class_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Property(id)));
        }

        Ok(DataProperty {
            id,
            name: draft.name,
            type_class_id: draft.type_class_id,
        })
    }
}

fn parse_property_row(row: &Row<'_>) -> RepoResult<DataProperty> {
    Ok(DataProperty {
        id: row.get("id")?,
        name: row.get("name")?,
        type_class_id: row.get("type_class_id")?,
    })
}
