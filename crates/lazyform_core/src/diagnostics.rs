//! Diagnostic policy and error types for schema and dialog operations.
//!
//! # Responsibility
//! - Classify the conditions the form subsystem used to swallow silently.
//! - Let callers choose between silent, warning and strict handling.
//!
//! # Invariants
//! - `Silent` keeps historical behavior: conditions are logged at debug only.
//! - Diagnostics carry field names and data types, never field values.

use crate::dialog::labels::DialogType;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Handling policy for recoverable schema/dialog conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsMode {
    /// Drop the offending input and log at debug level.
    #[default]
    Silent,
    /// Drop the offending input, log at warn level and record a diagnostic.
    Warn,
    /// Reject the offending input with an error.
    Strict,
}

impl DiagnosticsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Warn => "warn",
            Self::Strict => "strict",
        }
    }

    pub fn records(self) -> bool {
        !matches!(self, Self::Silent)
    }
}

/// Non-fatal condition observed while building or editing a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormDiagnostic {
    /// No schema could be resolved for the dialog's data type.
    MissingSchema { data_type: String },
    /// A field write targeted a key absent from the working copy.
    UnknownFieldWrite { field: String },
    /// A field write was attempted on a read-only dialog.
    ReadOnlyWrite { field: String, dialog_type: DialogType },
    /// A simplified-schema key had no matching field in the full schema.
    DroppedSimplifiedSchemaKey { field: String },
    /// A working-copy value does not fit its field descriptor.
    InvalidValue { field: String, reason: String },
}

impl Display for FormDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSchema { data_type } => {
                write!(f, "no form schema registered for `{data_type}`")
            }
            Self::UnknownFieldWrite { field } => {
                write!(f, "ignored write to unknown field `{field}`")
            }
            Self::ReadOnlyWrite { field, dialog_type } => write!(
                f,
                "ignored write to `{field}` in read-only {} dialog",
                dialog_type.as_str()
            ),
            Self::DroppedSimplifiedSchemaKey { field } => {
                write!(f, "simplified schema key `{field}` has no base field")
            }
            Self::InvalidValue { field, reason } => write!(f, "field `{field}`: {reason}"),
        }
    }
}

/// Errors from schema merge and schema document handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Strict merge found a simplified key with no base field.
    KeyNotFound(String),
    /// Schema document could not be decoded.
    InvalidSchema(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound(key) => write!(f, "schema key not found: {key}"),
            Self::InvalidSchema(message) => write!(f, "invalid schema document: {message}"),
        }
    }
}

impl Error for SchemaError {}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidSchema(value.to_string())
    }
}

/// Errors from dialog state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// Operation requires an open dialog.
    NotOpen,
    /// Strict mode rejected a write to an unknown field.
    UnknownField(String),
    /// Strict mode rejected a write in a read-only dialog.
    ReadOnly(DialogType),
    /// The requested action is not offered by the current dialog type.
    UnavailableAction(&'static str),
    /// Schema merge failed under strict policy.
    Schema(SchemaError),
}

impl Display for DialogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "dialog is not open"),
            Self::UnknownField(name) => write!(f, "unknown field: {name}"),
            Self::ReadOnly(dialog_type) => {
                write!(f, "{} dialog is read-only", dialog_type.as_str())
            }
            Self::UnavailableAction(action) => {
                write!(f, "action `{action}` is not available in this dialog")
            }
            Self::Schema(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DialogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SchemaError> for DialogError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogError, DiagnosticsMode, FormDiagnostic, SchemaError};
    use crate::dialog::labels::DialogType;
    use std::error::Error;

    #[test]
    fn default_mode_is_silent() {
        assert_eq!(DiagnosticsMode::default(), DiagnosticsMode::Silent);
        assert!(!DiagnosticsMode::Silent.records());
        assert!(DiagnosticsMode::Warn.records());
    }

    #[test]
    fn diagnostic_messages_name_fields_only() {
        let message = FormDiagnostic::ReadOnlyWrite {
            field: "title".to_string(),
            dialog_type: DialogType::View,
        }
        .to_string();
        assert!(message.contains("`title`"));
        assert!(message.contains("view"));
    }

    #[test]
    fn dialog_error_exposes_schema_source() {
        let err = DialogError::from(SchemaError::KeyNotFound("ghost".to_string()));
        assert_eq!(err.to_string(), "schema key not found: ghost");
        assert!(err.source().is_some());
        assert!(DialogError::NotOpen.source().is_none());
    }
}
