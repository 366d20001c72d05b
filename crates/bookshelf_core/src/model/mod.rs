//! Catalog domain model.
//!
//! # Responsibility
//! - Define the creator/publisher/work records handled by core services.
//! - Keep records as plain values; identity is the stored `RecordId`.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId` that is never reused.
//! - A `Work` always carries its resolved creator and publisher.

pub mod record;
pub mod work;
