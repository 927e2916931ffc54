//! Schema-driven form generation.
//!
//! # Responsibility
//! - Turn an effective schema plus current values into a control layout.
//! - Define the events a rendered form reports back to its dialog.
//!
//! # Invariants
//! - One control per schema key, in schema key order.
//! - The generator never mutates data; it only emits `FormEvent`s.

pub mod layout;
pub mod options;
pub mod values;

pub use layout::{
    build_form_layout, select_control, ControlKind, FieldControl, FormLayout, FormSource,
};
pub use options::FormRenderOptions;
pub use values::{check_data, check_value, seed_defaults};

use crate::model::schema::DataMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event emitted by a rendered form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// One field changed.
    Change { name: String, value: Value },
    /// The form reports its whole updated object.
    Update { data: DataMap },
    /// The form asked to submit.
    Submit,
}
