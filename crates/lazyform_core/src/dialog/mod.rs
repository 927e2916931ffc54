//! Dialog subsystem.
//!
//! # Responsibility
//! - Resolve dialog labels from the dialog type.
//! - Drive the open/edit/submit/close lifecycle of one entity form.
//! - Provide the CRUD data dialog with fixed actions.

pub mod data_dialog;
pub mod labels;
pub mod wrapper;
