//! Repository layer for the schema store.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Expose stored schemas through the `SchemaProvider` seam.

pub mod schema_repo;
