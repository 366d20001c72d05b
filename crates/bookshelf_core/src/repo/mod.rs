//! Persistence store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the store seams consumed by registries and the work catalog.
//! - Isolate SQL details from service-level rules.
//!
//! # Invariants
//! - Single-record lookups return `Ok(None)` on no match, never an error.
//! - `put` is an upsert keyed by record id.
//! - A delete blocked by a foreign key surfaces as `IntegrityViolation`, not
//!   as a raw SQLite error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::record::RecordId;
use rusqlite::Connection;
use thiserror::Error;

pub mod named_repo;
pub mod work_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from persistence store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    #[error("{0}")]
    Db(#[from] DbError),
    /// Remove targeted an id with no row.
    #[error("{table} row not found: {id}")]
    NotFound { table: &'static str, id: RecordId },
    /// Remove rejected because other rows still reference the target.
    #[error("{table} row {id} is still referenced by other rows")]
    IntegrityViolation { table: &'static str, id: RecordId },
    /// Connection schema is not at the expected migrated version.
    #[error("store requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    #[error("store requires table `{0}`")]
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    #[error("store requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Checks that `conn` is migrated and exposes `table` with `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(StoreError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(StoreError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

pub(crate) fn parse_record_id(value: &str, column: &'static str) -> StoreResult<RecordId> {
    RecordId::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &'static str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
