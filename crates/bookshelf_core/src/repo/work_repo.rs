//! Work store contract and SQLite implementation.
//!
//! # Invariants
//! - Reads hydrate the referenced creator and publisher in the same query.
//! - Writes store foreign keys only; the referenced rows must already exist.

use crate::model::record::{Creator, Publisher, RecordId};
use crate::model::work::Work;
use crate::repo::{
    bool_to_int, ensure_table_ready, parse_flag, parse_record_id, StoreError, StoreResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

const WORK_COLUMNS: &[&str] = &[
    "id",
    "isbn",
    "title",
    "year",
    "total_copies",
    "loaned_copies",
    "creator_id",
    "publisher_id",
    "active",
    "created_at",
    "updated_at",
];

const WORK_SELECT_SQL: &str = "SELECT
    w.id AS work_id,
    w.isbn AS isbn,
    w.title AS title,
    w.year AS year,
    w.total_copies AS total_copies,
    w.loaned_copies AS loaned_copies,
    w.active AS work_active,
    c.id AS creator_id,
    c.name AS creator_name,
    c.active AS creator_active,
    p.id AS publisher_id,
    p.name AS publisher_name,
    p.active AS publisher_active
FROM works w
JOIN creators c ON c.id = w.creator_id
JOIN publishers p ON p.id = w.publisher_id";

const WORK_ORDER_SQL: &str = "ORDER BY w.created_at ASC, w.rowid ASC";

/// Store interface for works.
pub trait WorkStore {
    /// Inserts or overwrites the work keyed by its id.
    fn put(&self, work: &Work) -> StoreResult<()>;
    /// Loads one work by id.
    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<Work>>;
    /// Loads the work carrying `isbn`.
    fn find_by_isbn(&self, isbn: i64) -> StoreResult<Option<Work>>;
    /// Loads the work whose title equals `title` (case-sensitive).
    fn find_by_title(&self, title: &str) -> StoreResult<Option<Work>>;
    /// Lists works whose creator name equals `name`.
    fn find_by_creator_name(&self, name: &str) -> StoreResult<Vec<Work>>;
    /// Lists works whose publisher name equals `name`.
    fn find_by_publisher_name(&self, name: &str) -> StoreResult<Vec<Work>>;
    /// Lists all works in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Work>>;
    /// Removes one work by id.
    fn remove(&self, id: RecordId) -> StoreResult<()>;
}

/// SQLite-backed work store.
pub struct SqliteWorkStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(conn, "works", WORK_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, param: &dyn ToSql) -> StoreResult<Option<Work>> {
        let raw = self
            .conn
            .query_row(
                &format!("{WORK_SELECT_SQL} WHERE {filter} {WORK_ORDER_SQL};"),
                [param],
                read_raw_row,
            )
            .optional()?;
        raw.map(parse_work_row).transpose()
    }

    fn query_many(
        &self,
        filter: Option<&str>,
        param: Option<&dyn ToSql>,
    ) -> StoreResult<Vec<Work>> {
        let sql = match filter {
            Some(filter) => format!("{WORK_SELECT_SQL} WHERE {filter} {WORK_ORDER_SQL};"),
            None => format!("{WORK_SELECT_SQL} {WORK_ORDER_SQL};"),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let params: Vec<&dyn ToSql> = param.into_iter().collect();
        let rows = stmt.query_map(params.as_slice(), read_raw_row)?;

        let mut works = Vec::new();
        for raw in rows {
            works.push(parse_work_row(raw?)?);
        }
        Ok(works)
    }
}

impl WorkStore for SqliteWorkStore<'_> {
    fn put(&self, work: &Work) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO works (
                id,
                isbn,
                title,
                year,
                total_copies,
                loaned_copies,
                creator_id,
                publisher_id,
                active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (id) DO UPDATE SET
                isbn = excluded.isbn,
                title = excluded.title,
                year = excluded.year,
                total_copies = excluded.total_copies,
                loaned_copies = excluded.loaned_copies,
                creator_id = excluded.creator_id,
                publisher_id = excluded.publisher_id,
                active = excluded.active,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                work.id.to_string(),
                work.isbn,
                work.title.as_str(),
                work.year,
                work.total_copies,
                work.loaned_copies,
                work.creator.id.to_string(),
                work.publisher.id.to_string(),
                bool_to_int(work.active),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<Work>> {
        self.query_one("w.id = ?1", &id.to_string())
    }

    fn find_by_isbn(&self, isbn: i64) -> StoreResult<Option<Work>> {
        self.query_one("w.isbn = ?1", &isbn)
    }

    fn find_by_title(&self, title: &str) -> StoreResult<Option<Work>> {
        self.query_one("w.title = ?1", &title)
    }

    fn find_by_creator_name(&self, name: &str) -> StoreResult<Vec<Work>> {
        self.query_many(Some("c.name = ?1"), Some(&name))
    }

    fn find_by_publisher_name(&self, name: &str) -> StoreResult<Vec<Work>> {
        self.query_many(Some("p.name = ?1"), Some(&name))
    }

    fn list_all(&self) -> StoreResult<Vec<Work>> {
        self.query_many(None, None)
    }

    fn remove(&self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM works WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound { table: "works", id });
        }
        Ok(())
    }
}

struct RawWorkRow {
    work_id: String,
    isbn: i64,
    title: String,
    year: i32,
    total_copies: i32,
    loaned_copies: i32,
    work_active: i64,
    creator_id: String,
    creator_name: String,
    creator_active: i64,
    publisher_id: String,
    publisher_name: String,
    publisher_active: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawWorkRow> {
    Ok(RawWorkRow {
        work_id: row.get("work_id")?,
        isbn: row.get("isbn")?,
        title: row.get("title")?,
        year: row.get("year")?,
        total_copies: row.get("total_copies")?,
        loaned_copies: row.get("loaned_copies")?,
        work_active: row.get("work_active")?,
        creator_id: row.get("creator_id")?,
        creator_name: row.get("creator_name")?,
        creator_active: row.get("creator_active")?,
        publisher_id: row.get("publisher_id")?,
        publisher_name: row.get("publisher_name")?,
        publisher_active: row.get("publisher_active")?,
    })
}

fn parse_work_row(raw: RawWorkRow) -> StoreResult<Work> {
    let creator = Creator::with_id(
        parse_record_id(&raw.creator_id, "creators.id")?,
        raw.creator_name,
        parse_flag(raw.creator_active, "creators.active")?,
    );
    let publisher = Publisher::with_id(
        parse_record_id(&raw.publisher_id, "publishers.id")?,
        raw.publisher_name,
        parse_flag(raw.publisher_active, "publishers.active")?,
    );

    if raw.loaned_copies > raw.total_copies {
        return Err(StoreError::InvalidData(format!(
            "works.loaned_copies {} exceeds works.total_copies {}",
            raw.loaned_copies, raw.total_copies
        )));
    }

    Ok(Work {
        id: parse_record_id(&raw.work_id, "works.id")?,
        isbn: raw.isbn,
        title: raw.title,
        year: raw.year,
        total_copies: raw.total_copies,
        loaned_copies: raw.loaned_copies,
        creator,
        publisher,
        active: parse_flag(raw.work_active, "works.active")?,
    })
}
