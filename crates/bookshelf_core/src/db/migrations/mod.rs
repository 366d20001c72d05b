//! Versioned catalog schema.
//!
//! Each script brings the schema from `version - 1` to `version`; the
//! number reached is stamped on the database as `user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs, ascending.
const SCRIPTS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_works.sql")),
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |&(version, _)| version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Pending scripts run inside a single transaction, so a failing script
/// leaves the database at its previous version.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is newer than this build.
/// - `DbError::Sqlite` when a script fails.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending: Vec<_> = SCRIPTS.iter().filter(|&&(version, _)| version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, script) in &pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={to} scripts={}",
        pending.len()
    );
    Ok(())
}

/// Schema version currently stamped on `conn`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, SCRIPTS};

    #[test]
    fn script_versions_are_contiguous_from_one() {
        for (index, &(version, _)) in SCRIPTS.iter().enumerate() {
            assert_eq!(version as usize, index + 1);
        }
        assert_eq!(latest_version() as usize, SCRIPTS.len());
    }
}
