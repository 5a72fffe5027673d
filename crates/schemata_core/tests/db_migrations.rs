use rusqlite::Connection;
use schemata_core::db::migrations::latest_version;
use schemata_core::db::{open_db, open_db_in_memory, DbError};
use schemata_core::repo::class_repo::ClassRepository;
use schemata_core::{ClassKind, SqliteRepositories, STRING_PRIMITIVE_CLASS_ID};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "data_classes");
    assert_table_exists(&conn, "data_properties");
    assert_table_exists(&conn, "class_property_relations");
    assert_table_exists(&conn, "data_objects");
    assert_table_exists(&conn, "data_object_properties");
    assert_table_exists(&conn, "data_values");
}

#[test]
fn string_primitive_is_seeded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemata.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = repos.classes.list_classes().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].id, STRING_PRIMITIVE_CLASS_ID);
    assert_eq!(classes[0].name, "String");
    assert_eq!(classes[0].kind, ClassKind::PrimitiveDefined);
}

#[test]
fn user_classes_get_ids_after_the_seed() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO data_classes (name, type) VALUES ('Person', 'UserDefinedClass');",
        [],
    )
    .unwrap();

    assert!(conn.last_insert_rowid() > STRING_PRIMITIVE_CLASS_ID);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            store_version,
            latest_supported,
        } => {
            assert_eq!(store_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reopening_store_without_string_primitive_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("damaged.db");

    let conn = open_db(&path).unwrap();
    conn.execute("DELETE FROM data_classes WHERE id = 0;", [])
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::MissingSeedClass { class_id, name } => {
            assert_eq!(class_id, STRING_PRIMITIVE_CLASS_ID);
            assert_eq!(name, "String");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteRepositories::try_new(&conn).err().unwrap();
    assert!(err.to_string().contains("data_classes"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
