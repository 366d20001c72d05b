//! Creator/publisher store contract and SQLite implementation.
//!
//! One generic store serves both namespaces; the kind marker picks the table.

use crate::model::record::{CreatorKind, NamedRecord, PublisherKind, RecordId, RecordKind};
use crate::repo::{
    bool_to_int, ensure_table_ready, is_foreign_key_violation, parse_flag, parse_record_id,
    StoreError, StoreResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::marker::PhantomData;

const NAMED_COLUMNS: &[&str] = &["id", "name", "active", "created_at", "updated_at"];

/// Store interface for one named-record namespace.
pub trait NamedRecordStore<K: RecordKind> {
    /// Inserts or overwrites the record keyed by its id.
    fn put(&self, record: &NamedRecord<K>) -> StoreResult<()>;
    /// Loads one record by id.
    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<NamedRecord<K>>>;
    /// Loads the first record whose name equals `name` (case-sensitive).
    fn find_by_name(&self, name: &str) -> StoreResult<Option<NamedRecord<K>>>;
    /// Lists all records in insertion order.
    fn list_all(&self) -> StoreResult<Vec<NamedRecord<K>>>;
    /// Removes one record by id.
    fn remove(&self, id: RecordId) -> StoreResult<()>;
}

/// SQLite-backed named-record store.
pub struct SqliteNamedStore<'conn, K: RecordKind> {
    conn: &'conn Connection,
    kind: PhantomData<K>,
}

pub type SqliteCreatorStore<'conn> = SqliteNamedStore<'conn, CreatorKind>;
pub type SqlitePublisherStore<'conn> = SqliteNamedStore<'conn, PublisherKind>;

impl<'conn, K: RecordKind> SqliteNamedStore<'conn, K> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(conn, K::TABLE, NAMED_COLUMNS)?;
        Ok(Self {
            conn,
            kind: PhantomData,
        })
    }

    fn select_sql(filter: &str) -> String {
        format!(
            "SELECT id, name, active FROM {} {filter} ORDER BY created_at ASC, rowid ASC",
            K::TABLE
        )
    }
}

impl<K: RecordKind> NamedRecordStore<K> for SqliteNamedStore<'_, K> {
    fn put(&self, record: &NamedRecord<K>) -> StoreResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, name, active)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    active = excluded.active,
                    updated_at = (strftime('%s', 'now') * 1000);",
                K::TABLE
            ),
            params![
                record.id.to_string(),
                record.name.as_str(),
                bool_to_int(record.active)
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<NamedRecord<K>>> {
        let raw = self
            .conn
            .query_row(
                &Self::select_sql("WHERE id = ?1"),
                [id.to_string()],
                read_raw_row,
            )
            .optional()?;
        raw.map(parse_named_row::<K>).transpose()
    }

    fn find_by_name(&self, name: &str) -> StoreResult<Option<NamedRecord<K>>> {
        let raw = self
            .conn
            .query_row(&Self::select_sql("WHERE name = ?1"), [name], read_raw_row)
            .optional()?;
        raw.map(parse_named_row::<K>).transpose()
    }

    fn list_all(&self) -> StoreResult<Vec<NamedRecord<K>>> {
        let mut stmt = self.conn.prepare(&Self::select_sql(""))?;
        let rows = stmt.query_map([], read_raw_row)?;
        let mut records = Vec::new();
        for raw in rows {
            records.push(parse_named_row::<K>(raw?)?);
        }
        Ok(records)
    }

    fn remove(&self, id: RecordId) -> StoreResult<()> {
        let result = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", K::TABLE),
            [id.to_string()],
        );

        match result {
            Ok(0) => Err(StoreError::NotFound {
                table: K::TABLE,
                id,
            }),
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(StoreError::IntegrityViolation {
                table: K::TABLE,
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

struct RawNamedRow {
    id: String,
    name: String,
    active: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawNamedRow> {
    Ok(RawNamedRow {
        id: row.get("id")?,
        name: row.get("name")?,
        active: row.get("active")?,
    })
}

fn parse_named_row<K: RecordKind>(raw: RawNamedRow) -> StoreResult<NamedRecord<K>> {
    let id = parse_record_id(&raw.id, K::TABLE)?;
    let active = parse_flag(raw.active, K::TABLE)?;
    Ok(NamedRecord::with_id(id, raw.name, active))
}
