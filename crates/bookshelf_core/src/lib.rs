//! Core domain logic for the bookshelf catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{init_logging, logging_status, LogTarget, LoggingError};
pub use model::record::{
    Creator, CreatorKind, NamedRecord, Publisher, PublisherKind, RecordId, RecordKind,
};
pub use model::work::{Work, WorkInput};
pub use repo::named_repo::{
    NamedRecordStore, SqliteCreatorStore, SqliteNamedStore, SqlitePublisherStore,
};
pub use repo::work_repo::{SqliteWorkStore, WorkStore};
pub use repo::{StoreError, StoreResult};
pub use service::catalog::{SqliteWorkCatalog, WorkCatalog};
pub use service::error::{CatalogError, CatalogResult};
pub use service::registry::{CreatorRegistry, NameRegistry, PublisherRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
