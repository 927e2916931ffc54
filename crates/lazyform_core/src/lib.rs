//! Core domain logic for LazyForm.
//! Schema merging, dialog labels and the dialog state machine live here;
//! UI shells render what this crate resolves.

pub mod db;
pub mod diagnostics;
pub mod dialog;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use diagnostics::{DialogError, DiagnosticsMode, FormDiagnostic, SchemaError};
pub use dialog::data_dialog::{ActionKind, DataDialog, DataDialogView, DialogAction};
pub use dialog::labels::{
    humanize_data_type, resolve_dialog_labels, resolve_dialog_labels_with_name, DialogLabels,
    DialogType,
};
pub use dialog::wrapper::{
    CancelBehavior, DialogHandler, DialogOptions, DialogRecord, DialogState, DialogView,
    DialogWrapper, OpenRequest, SharedDataProvider, SharedSchemaProvider, Submission,
};
pub use form::{FormEvent, FormLayout, FormRenderOptions};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::field::{FieldDescriptor, FieldSettings, FieldType, PresentationHints};
pub use model::schema::{DataMap, Schema, SchemaEntry, SimplifiedSchema};
pub use repo::schema_repo::{SchemaRepoError, SchemaRepoResult, SqliteSchemaRepository};
pub use schema::merge::{merge_simplified_schema, merge_with_mode, MergeMode, MergeReport};
pub use schema::registry::{
    DataProvider, InMemoryDataRegistry, InMemorySchemaRegistry, NoData, SchemaProvider,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
