//! Table layout versions of the metadata store.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - Every pending step runs inside one transaction; a failing step leaves
//!   the store at its previous version.
//! - After migrating, the seeded `String` primitive must be present.

use crate::db::{DbError, DbResult};
use crate::model::data_class::{STRING_PRIMITIVE_CLASS_ID, STRING_PRIMITIVE_CLASS_NAME};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// One versioned SQL batch.
#[derive(Debug, Clone, Copy)]
struct Step {
    version: u32,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Step {
        version: 2,
        sql: include_str!("0002_seed_primitives.sql"),
    },
];

/// Latest table layout this build can read and write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Migrates `conn` to `latest_version()` and checks the seed rows.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store is newer than this build.
/// - `Migration` naming the step that failed.
/// - `MissingSeedClass` when the `String` primitive was removed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = stored_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            store_version: from,
            latest_supported: latest,
        });
    }

    if from < latest {
        let tx = conn.transaction()?;
        for step in STEPS.iter().filter(|step| step.version > from) {
            run_step(&tx, step)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    }

    ensure_string_primitive(conn)
}

fn run_step(tx: &Transaction<'_>, step: &Step) -> DbResult<()> {
    tx.execute_batch(step.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", step.version))
        .map_err(|source| DbError::Migration {
            version: step.version,
            source,
        })?;
    debug!("event=db_migrate_step module=db status=ok version={}", step.version);
    Ok(())
}

fn ensure_string_primitive(conn: &Connection) -> DbResult<()> {
    let seeded = conn
        .query_row(
            "SELECT 1 FROM data_classes WHERE id = ?1 AND name = ?2;",
            rusqlite::params![STRING_PRIMITIVE_CLASS_ID, STRING_PRIMITIVE_CLASS_NAME],
            |_| Ok(()),
        )
        .optional()?;
    match seeded {
        Some(()) => Ok(()),
        None => Err(DbError::MissingSeedClass {
            class_id: STRING_PRIMITIVE_CLASS_ID,
            name: STRING_PRIMITIVE_CLASS_NAME,
        }),
    }
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
