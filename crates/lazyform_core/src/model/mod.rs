//! Form schema data model.
//!
//! # Responsibility
//! - Define field descriptors, schemas and simplified-schema overrides.
//! - Keep a single typed shape for schemas read from JSON documents.
//!
//! # Invariants
//! - Schema key order is insertion order and drives render order.
//! - Model values are plain data; merging and rendering live elsewhere.

pub mod field;
pub mod schema;
