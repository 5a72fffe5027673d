//! Class–property relation repository contract and SQLite implementation.
//!
//! # Invariants
//! - Edges for one class are returned in creation order (`id ASC`).
//! - Edges are stored as given; endpoint existence is checked by callers.

use crate::model::data_class::ClassId;
use crate::model::data_property::PropertyId;
use crate::model::relation::ClassPropertyRelation;
use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for ownership edges.
pub trait RelationRepository {
    fn list_relations_for_class(&self, class_id: ClassId)
        -> RepoResult<Vec<ClassPropertyRelation>>;
    fn create_relation(
        &self,
        class_id: ClassId,
        property_id: PropertyId,
    ) -> RepoResult<ClassPropertyRelation>;
}

/// SQLite-backed relation repository.
#[derive(Clone, Copy)]
pub struct SqliteRelationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["class_property_relations"])?;
        Ok(Self { conn })
    }
}

impl RelationRepository for SqliteRelationRepository<'_> {
    fn list_relations_for_class(
        &self,
        class_id: ClassId,
    ) -> RepoResult<Vec<ClassPropertyRelation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data_class_id, data_property_id
             FROM class_property_relations
             WHERE data_class_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([class_id])?;
        let mut relations = Vec::new();
        while let Some(row) = rows.next()? {
            relations.push(parse_relation_row(row)?);
        }
        Ok(relations)
    }

    fn create_relation(
        &self,
        class_id: ClassId,
        property_id: PropertyId,
    ) -> RepoResult<ClassPropertyRelation> {
        self.conn.execute(
            "INSERT INTO class_property_relations (data_class_id, data_property_id)
             VALUES (?1, ?2);",
            params![class_id, property_id],
        )?;

        Ok(ClassPropertyRelation {
            id: self.conn.last_insert_rowid(),
            data_class_id: class_id,
            data_property_id: property_id,
        })
    }
}

fn parse_relation_row(row: &Row<'_>) -> RepoResult<ClassPropertyRelation> {
    Ok(ClassPropertyRelation {
        id: row.get("id")?,
        data_class_id: row.get("data_class_id")?,
        data_property_id: row.get("data_property_id")?,
    })
}
