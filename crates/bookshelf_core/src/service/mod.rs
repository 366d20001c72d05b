//! Core use-case services.
//!
//! # Responsibility
//! - Enforce name uniqueness, reference resolution, and deletion safety.
//! - Translate store outcomes into `CatalogError` variants callers can match.
//!
//! # Invariants
//! - Services never bypass store contracts or write SQL directly.
//! - Only store integrity violations are translated; other store failures are
//!   logged and propagated as `CatalogError::Store`.

pub mod catalog;
pub mod error;
pub mod registry;
