//! Work (catalog item) domain model.
//!
//! # Invariants
//! - `isbn` and `title` are unique across all works (enforced by the catalog
//!   service and backed by `UNIQUE` constraints).
//! - `loaned_copies <= total_copies`; available copies are derived on read.

use crate::model::record::{Creator, Publisher, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// A catalog item referencing exactly one creator and one publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: RecordId,
    pub isbn: i64,
    pub title: String,
    pub year: i32,
    pub total_copies: i32,
    pub loaned_copies: i32,
    pub creator: Creator,
    pub publisher: Publisher,
    pub active: bool,
}

impl Work {
    /// Assembles an active work with a freshly generated id.
    ///
    /// Performs no validation; `WorkCatalog` owns the rules.
    pub fn new(input: &WorkInput, creator: Creator, publisher: Publisher) -> Self {
        Self {
            id: Uuid::new_v4(),
            isbn: input.isbn,
            title: input.title.clone(),
            year: input.year,
            total_copies: input.total_copies,
            loaned_copies: input.loaned_copies,
            creator,
            publisher,
            active: true,
        }
    }

    /// Copies the scalar fields of `input` onto this work.
    pub(crate) fn apply(&mut self, input: &WorkInput) {
        self.isbn = input.isbn;
        self.title = input.title.clone();
        self.year = input.year;
        self.total_copies = input.total_copies;
        self.loaned_copies = input.loaned_copies;
    }

    /// Copies not currently on loan.
    pub fn available_copies(&self) -> i32 {
        self.total_copies - self.loaned_copies
    }
}

impl Display for Work {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ISBN {} | {} ({}) | copies total={} loaned={} available={} | creator: {} | publisher: {}",
            self.isbn,
            self.title,
            self.year,
            self.total_copies,
            self.loaned_copies,
            self.available_copies(),
            self.creator,
            self.publisher
        )
    }
}

/// Caller-supplied field values for creating or modifying a work.
///
/// Creator and publisher are given by name and resolved by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkInput {
    pub isbn: i64,
    pub title: String,
    pub year: i32,
    pub total_copies: i32,
    pub loaned_copies: i32,
    pub creator_name: String,
    pub publisher_name: String,
}
