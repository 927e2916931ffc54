//! Schema merge and schema lookup seams.
//!
//! # Responsibility
//! - Combine simplified schemas with full schemas.
//! - Define provider traits for schema and entity lookup.

pub mod merge;
pub mod registry;
