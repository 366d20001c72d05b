//! Work catalog use-case service.
//!
//! # Responsibility
//! - Validate work fields and uniqueness before any write.
//! - Resolve creator/publisher names to records, creating missing ones.
//!
//! # Invariants
//! - Name resolution runs only after every field check passed, so a rejected
//!   work never creates a creator or publisher.
//! - isbn/title uniqueness ignores only the work being modified (by id).
//! - Creator/publisher auto-creation is not rolled back if the work write
//!   fails afterwards; unreferenced names may remain.

use crate::model::record::{CreatorKind, PublisherKind, RecordId};
use crate::model::work::{Work, WorkInput};
use crate::repo::named_repo::{NamedRecordStore, SqliteCreatorStore, SqlitePublisherStore};
use crate::repo::work_repo::{SqliteWorkStore, WorkStore};
use crate::repo::{StoreError, StoreResult};
use crate::service::error::{CatalogError, CatalogResult};
use crate::service::registry::{CreatorRegistry, PublisherRegistry};
use log::info;
use rusqlite::Connection;

/// Work catalog composed over a work store and both name registries.
pub struct WorkCatalog<W, C, P>
where
    W: WorkStore,
    C: NamedRecordStore<CreatorKind>,
    P: NamedRecordStore<PublisherKind>,
{
    works: W,
    creators: CreatorRegistry<C>,
    publishers: PublisherRegistry<P>,
}

/// Catalog wired to SQLite stores sharing one connection.
pub type SqliteWorkCatalog<'conn> =
    WorkCatalog<SqliteWorkStore<'conn>, SqliteCreatorStore<'conn>, SqlitePublisherStore<'conn>>;

impl<'conn> SqliteWorkCatalog<'conn> {
    /// Builds all three stores over a migrated connection.
    pub fn open(conn: &'conn Connection) -> StoreResult<Self> {
        Ok(Self::new(
            SqliteWorkStore::try_new(conn)?,
            CreatorRegistry::new(SqliteCreatorStore::try_new(conn)?),
            PublisherRegistry::new(SqlitePublisherStore::try_new(conn)?),
        ))
    }
}

impl<W, C, P> WorkCatalog<W, C, P>
where
    W: WorkStore,
    C: NamedRecordStore<CreatorKind>,
    P: NamedRecordStore<PublisherKind>,
{
    pub fn new(works: W, creators: CreatorRegistry<C>, publishers: PublisherRegistry<P>) -> Self {
        Self {
            works,
            creators,
            publishers,
        }
    }

    /// Creator registry used for name resolution.
    pub fn creators(&self) -> &CreatorRegistry<C> {
        &self.creators
    }

    /// Publisher registry used for name resolution.
    pub fn publishers(&self) -> &PublisherRegistry<P> {
        &self.publishers
    }

    /// Validates and persists a new work.
    ///
    /// # Errors
    /// - `Validation` for the first failing field or uniqueness check.
    pub fn create(&self, input: &WorkInput) -> CatalogResult<Work> {
        self.validate(input, None)?;

        let creator = self.creators.resolve(&input.creator_name)?;
        let publisher = self.publishers.resolve(&input.publisher_name)?;
        let work = Work::new(input, creator, publisher);
        self.works.put(&work)?;

        info!(
            "event=work_create module=service status=ok id={} creator_id={} publisher_id={}",
            work.id, work.creator.id, work.publisher.id
        );
        Ok(work)
    }

    /// Overwrites a stored work with `input`.
    ///
    /// Creator and publisher are re-resolved even when names are unchanged.
    /// `work` is left untouched when the change is rejected.
    ///
    /// # Errors
    /// - `Validation` when `work` is not stored or a check fails.
    pub fn modify(&self, work: &mut Work, input: &WorkInput) -> CatalogResult<()> {
        if self.works.get_by_id(work.id)?.is_none() {
            return Err(CatalogError::validation(format!(
                "work to modify does not exist: {}",
                work.id
            )));
        }
        self.validate(input, Some(work.id))?;

        let mut updated = work.clone();
        updated.apply(input);
        updated.creator = self.creators.resolve(&input.creator_name)?;
        updated.publisher = self.publishers.resolve(&input.publisher_name)?;
        updated.active = true;
        self.works.put(&updated)?;
        *work = updated;

        info!(
            "event=work_modify module=service status=ok id={} creator_id={} publisher_id={}",
            work.id, work.creator.id, work.publisher.id
        );
        Ok(())
    }

    /// Deletes the work carrying `isbn`.
    ///
    /// # Errors
    /// - `NotFound` when no work has `isbn`.
    pub fn delete(&self, isbn: i64) -> CatalogResult<()> {
        let work = self
            .works
            .find_by_isbn(isbn)?
            .ok_or_else(|| missing_isbn(isbn))?;

        match self.works.remove(work.id) {
            Ok(()) => {
                info!("event=work_delete module=service status=ok id={}", work.id);
                Ok(())
            }
            Err(StoreError::NotFound { .. }) => Err(missing_isbn(isbn)),
            Err(other) => Err(other.into()),
        }
    }

    /// Looks up a work by isbn; absence is not an error.
    pub fn find_by_isbn(&self, isbn: i64) -> CatalogResult<Option<Work>> {
        Ok(self.works.find_by_isbn(isbn)?)
    }

    /// Looks up a work by exact title.
    ///
    /// # Errors
    /// - `Validation` when `title` is blank.
    /// - `NotFound` when no work has `title`.
    pub fn find_by_title(&self, title: &str) -> CatalogResult<Work> {
        ensure_present(title, "title")?;
        self.works
            .find_by_title(title)?
            .ok_or_else(|| CatalogError::not_found(format!("no work titled `{title}`")))
    }

    /// Lists works whose creator is named `name`.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    /// - `NotFound` when no work matches.
    pub fn find_by_creator(&self, name: &str) -> CatalogResult<Vec<Work>> {
        ensure_present(name, "creator name")?;
        non_empty(
            self.works.find_by_creator_name(name)?,
            format!("no works found for creator `{name}`"),
        )
    }

    /// Lists works whose publisher is named `name`.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    /// - `NotFound` when no work matches.
    pub fn find_by_publisher(&self, name: &str) -> CatalogResult<Vec<Work>> {
        ensure_present(name, "publisher name")?;
        non_empty(
            self.works.find_by_publisher_name(name)?,
            format!("no works found for publisher `{name}`"),
        )
    }

    pub fn list_all(&self) -> CatalogResult<Vec<Work>> {
        Ok(self.works.list_all()?)
    }

    fn validate(&self, input: &WorkInput, current: Option<RecordId>) -> CatalogResult<()> {
        let is_other = |found: &Work| Some(found.id) != current;

        if input.isbn < 0 {
            return Err(CatalogError::validation("isbn must not be negative"));
        }
        if let Some(holder) = self.works.find_by_isbn(input.isbn)?.filter(is_other) {
            return Err(CatalogError::validation(format!(
                "isbn {} already belongs to another work: ISBN {} / title `{}`",
                input.isbn, holder.isbn, holder.title
            )));
        }
        ensure_present(&input.title, "title")?;
        if input.year < 0 {
            return Err(CatalogError::validation("year must not be negative"));
        }
        if input.total_copies < 0 {
            return Err(CatalogError::validation("total copies must not be negative"));
        }
        if input.loaned_copies < 0 {
            return Err(CatalogError::validation("loaned copies must not be negative"));
        }
        if input.total_copies - input.loaned_copies < 0 {
            return Err(CatalogError::validation(format!(
                "loaned copies ({}) cannot exceed total copies ({})",
                input.loaned_copies, input.total_copies
            )));
        }
        ensure_present(&input.creator_name, "creator name")?;
        ensure_present(&input.publisher_name, "publisher name")?;
        if self
            .works
            .find_by_title(&input.title)?
            .filter(is_other)
            .is_some()
        {
            return Err(CatalogError::validation(format!(
                "title `{}` already belongs to another work",
                input.title
            )));
        }

        Ok(())
    }
}

fn ensure_present(value: &str, field: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn non_empty(works: Vec<Work>, message: String) -> CatalogResult<Vec<Work>> {
    if works.is_empty() {
        return Err(CatalogError::NotFound(message));
    }
    Ok(works)
}

fn missing_isbn(isbn: i64) -> CatalogError {
    CatalogError::not_found(format!("no work with isbn {isbn}"))
}
