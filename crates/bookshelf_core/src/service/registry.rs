//! Creator/publisher registry service.
//!
//! # Responsibility
//! - Enforce name rules for one named-record namespace.
//! - Guard deletes against records still referenced by works.
//!
//! # Invariants
//! - Names are non-blank and unique within the namespace.
//! - Every write re-asserts `active = true`.
//! - A foreign-key rejection from the store surfaces as
//!   `CatalogError::Integrity`, never as a raw store error.

use crate::model::record::{CreatorKind, NamedRecord, PublisherKind, RecordId, RecordKind};
use crate::repo::named_repo::NamedRecordStore;
use crate::repo::StoreError;
use crate::service::error::{CatalogError, CatalogResult};
use log::{info, warn};
use std::marker::PhantomData;

/// Registry facade over one named-record store.
pub struct NameRegistry<K: RecordKind, S: NamedRecordStore<K>> {
    store: S,
    kind: PhantomData<K>,
}

pub type CreatorRegistry<S> = NameRegistry<CreatorKind, S>;
pub type PublisherRegistry<S> = NameRegistry<PublisherKind, S>;

impl<K: RecordKind, S: NamedRecordStore<K>> NameRegistry<K, S> {
    /// Creates a registry from a store implementation.
    pub fn new(store: S) -> Self {
        Self {
            store,
            kind: PhantomData,
        }
    }

    /// Creates and persists a new active record named `name`.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank or already taken.
    pub fn create(&self, name: &str) -> CatalogResult<NamedRecord<K>> {
        ensure_name_present::<K>(name)?;
        if self.find_by_name(name)?.is_some() {
            return Err(duplicate_name::<K>(name));
        }

        let record = NamedRecord::new(name);
        self.store.put(&record)?;
        info!(
            "event=record_create module=service kind={} status=ok id={}",
            K::LABEL,
            record.id
        );
        Ok(record)
    }

    /// Renames a stored record in place.
    ///
    /// `record` is left untouched when the rename is rejected.
    ///
    /// # Errors
    /// - `Validation` when the record is not stored, `new_name` is blank, or
    ///   another record already holds `new_name`.
    pub fn rename(&self, record: &mut NamedRecord<K>, new_name: &str) -> CatalogResult<()> {
        if self.store.get_by_id(record.id)?.is_none() {
            return Err(CatalogError::validation(format!(
                "{} to rename does not exist: {}",
                K::LABEL,
                record.id
            )));
        }
        ensure_name_present::<K>(new_name)?;
        if let Some(holder) = self.find_by_name(new_name)? {
            if holder.id != record.id {
                return Err(duplicate_name::<K>(new_name));
            }
        }

        let mut updated = record.clone();
        updated.name = new_name.to_string();
        updated.active = true;
        self.store.put(&updated)?;
        *record = updated;

        info!(
            "event=record_rename module=service kind={} status=ok id={}",
            K::LABEL,
            record.id
        );
        Ok(())
    }

    /// Deletes the record with `id`.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`.
    /// - `Integrity` when works still reference the record.
    pub fn delete(&self, id: RecordId) -> CatalogResult<()> {
        if self.store.get_by_id(id)?.is_none() {
            return Err(missing_id::<K>(id));
        }

        match self.store.remove(id) {
            Ok(()) => {
                info!(
                    "event=record_delete module=service kind={} status=ok id={id}",
                    K::LABEL
                );
                Ok(())
            }
            Err(StoreError::IntegrityViolation { .. }) => {
                warn!(
                    "event=record_delete module=service kind={} status=rejected id={id} reason=referenced",
                    K::LABEL
                );
                Err(CatalogError::Integrity(format!(
                    "cannot delete {} {id}: it is referenced by one or more works; delete those works first",
                    K::LABEL
                )))
            }
            Err(StoreError::NotFound { .. }) => Err(missing_id::<K>(id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Looks up a record by exact name.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    pub fn find_by_name(&self, name: &str) -> CatalogResult<Option<NamedRecord<K>>> {
        ensure_name_present::<K>(name)?;
        Ok(self.store.find_by_name(name)?)
    }

    /// Lists every record of this kind.
    pub fn list_all(&self) -> CatalogResult<Vec<NamedRecord<K>>> {
        Ok(self.store.list_all()?)
    }

    /// Returns the record named `name`, creating it when absent.
    pub fn resolve(&self, name: &str) -> CatalogResult<NamedRecord<K>> {
        match self.find_by_name(name)? {
            Some(existing) => Ok(existing),
            None => self.create(name),
        }
    }
}

fn ensure_name_present<K: RecordKind>(name: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::validation(format!(
            "{} name must not be blank",
            K::LABEL
        )));
    }
    Ok(())
}

fn duplicate_name<K: RecordKind>(name: &str) -> CatalogError {
    CatalogError::validation(format!("a {} named `{name}` already exists", K::LABEL))
}

fn missing_id<K: RecordKind>(id: RecordId) -> CatalogError {
    CatalogError::not_found(format!("no {} with id {id}", K::LABEL))
}
