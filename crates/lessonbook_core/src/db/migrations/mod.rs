//! Ordered schema steps for the `records` table.
//!
//! # Invariants
//! - Step versions are contiguous, starting at 1.
//! - `PRAGMA user_version` always names the last applied step.
//! - Pending steps run in one transaction: all of them land or none do.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// `(version, sql)` in application order.
const STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_records.sql")),
    (2, include_str!("0002_owner_index.sql")),
];

/// Latest schema version known by this binary.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the schema from its recorded version up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is newer than this
///   build; nothing is changed.
/// - `DbError::Migration` naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<(u32, &str)> = STEPS
        .iter()
        .copied()
        .filter(|(version, _)| *version > from)
        .collect();
    let Some(&(first, _)) = pending.first() else {
        return Ok(());
    };

    let tx = conn
        .transaction()
        .map_err(|source| DbError::Migration { version: first, source })?;
    for (version, sql) in &pending {
        run_step(&tx, *version, sql)?;
    }
    tx.commit()
        .map_err(|source| DbError::Migration { version: latest, source })?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        from,
        latest,
        pending.len()
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, version: u32, sql: &str) -> DbResult<()> {
    tx.execute_batch(sql)
        .and_then(|()| tx.pragma_update(None, "user_version", version))
        .map_err(|source| DbError::Migration { version, source })?;
    debug!("event=db_migrate_step module=db status=ok version={version}");
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(|source| DbError::Pragma {
            name: "user_version",
            source,
        })
}
