//! Named reference records (creators and publishers).
//!
//! Creators and publishers share one shape and one set of rules, so both are
//! expressed as `NamedRecord<K>` where `K` is a zero-sized kind marker. The
//! marker selects the storage table and keeps the two namespaces apart at
//! compile time: a `Creator` cannot be passed where a `Publisher` is expected.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use uuid::Uuid;

/// Stable identifier for every catalog record.
pub type RecordId = Uuid;

/// Compile-time description of one named-record namespace.
pub trait RecordKind: Debug + Clone + Copy + PartialEq + Eq + 'static {
    /// SQLite table holding records of this kind.
    const TABLE: &'static str;
    /// Lowercase singular label used in messages and log events.
    const LABEL: &'static str;
}

/// Marker for creator records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorKind;

/// Marker for publisher records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublisherKind;

impl RecordKind for CreatorKind {
    const TABLE: &'static str = "creators";
    const LABEL: &'static str = "creator";
}

impl RecordKind for PublisherKind {
    const TABLE: &'static str = "publishers";
    const LABEL: &'static str = "publisher";
}

/// A creator or publisher row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct NamedRecord<K: RecordKind> {
    /// Assigned at creation, immutable afterwards.
    pub id: RecordId,
    /// Display name, unique within the kind.
    pub name: String,
    /// Always `true` for records written by core services.
    pub active: bool,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type Creator = NamedRecord<CreatorKind>;
pub type Publisher = NamedRecord<PublisherKind>;

impl<K: RecordKind> NamedRecord<K> {
    /// Creates an active record with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, true)
    }

    /// Rebuilds a record from persisted parts.
    pub fn with_id(id: RecordId, name: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            active,
            kind: PhantomData,
        }
    }

    /// Kind label (`creator` / `publisher`).
    pub fn label(&self) -> &'static str {
        K::LABEL
    }
}

impl<K: RecordKind> Display for NamedRecord<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
