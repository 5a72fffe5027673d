//! Class repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is insertion order (`id ASC`).
//! - Stored kind tags this build does not know read back as
//!   `ClassKind::Unknown`.
//! - `ClassKind::Unknown` is never written.

use crate::model::data_class::{ClassDraft, ClassId, ClassKind, DataClass};
use crate::repo::{ensure_tables, EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const CLASS_SELECT_SQL: &str = "SELECT id, name, type FROM data_classes";

/// Repository interface for data classes.
pub trait ClassRepository {
    fn list_classes(&self) -> RepoResult<Vec<DataClass>>;
    fn get_class(&self, id: ClassId) -> RepoResult<Option<DataClass>>;
    fn create_class(&self, draft: &ClassDraft) -> RepoResult<DataClass>;
    fn update_class(&self, id: ClassId, draft: &ClassDraft) -> RepoResult<DataClass>;
}

/// SQLite-backed class repository.
#[derive(Clone, Copy)]
pub struct SqliteClassRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClassRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["data_classes"])?;
        Ok(Self { conn })
    }
}

impl ClassRepository for SqliteClassRepository<'_> {
    fn list_classes(&self) -> RepoResult<Vec<DataClass>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLASS_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut classes = Vec::new();
        while let Some(row) = rows.next()? {
            classes.push(parse_class_row(row)?);
        }
        Ok(classes)
    }

    fn get_class(&self, id: ClassId) -> RepoResult<Option<DataClass>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLASS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_class_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_class(&self, draft: &ClassDraft) -> RepoResult<DataClass> {
        let draft = draft.normalized()?;
        let tag = kind_tag(draft.kind)?;
        self.conn.execute(
            "INSERT INTO data_classes (name, type) VALUES (?1, ?2);",
            params![draft.name.as_str(), tag],
        )?;

        Ok(DataClass {
            id: self.conn.last_insert_rowid(),
            name: draft.name,
            kind: draft.kind,
        })
    }

    fn update_class(&self, id: ClassId, draft: &ClassDraft) -> RepoResult<DataClass> {
        let draft = draft.normalized()?;
        let tag = kind_tag(draft.kind)?;
        let changed = self.conn.execute(
            "UPDATE data_classes
             SET
                name = ?2,
                type = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, draft.name.as_str(), tag],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Class(id)));
        }

        Ok(DataClass {
            id,
            name: draft.name,
            kind: draft.kind,
        })
    }
}

fn kind_tag(kind: ClassKind) -> RepoResult<&'static str> {
    kind.as_tag()
        .ok_or_else(|| RepoError::InvalidData("cannot persist a class of unknown kind".to_string()))
}

fn parse_class_row(row: &Row<'_>) -> RepoResult<DataClass> {
    let type_text: String = row.get("type")?;
    Ok(DataClass {
        id: row.get("id")?,
        name: row.get("name")?,
        kind: ClassKind::parse(&type_text).unwrap_or(ClassKind::Unknown),
    })
}
