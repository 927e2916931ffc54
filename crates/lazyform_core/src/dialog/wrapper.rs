//! Dialog state machine wrapping one schema-driven form.
//!
//! # Responsibility
//! - Own open/close state and the working copy of one entity.
//! - Resolve and merge the schema, then expose a renderable `DialogView`.
//! - Route form events to the caller's `DialogHandler`.
//!
//! # Invariants
//! - Field writes only touch keys already present in the working copy.
//! - Submit never transitions state; the caller decides when to close.
//! - Submit falls back to `initial_data` when the working copy is unset.
//! - Closing without a handler override drops the record entirely.

use crate::diagnostics::{DialogError, DiagnosticsMode, FormDiagnostic};
use crate::dialog::labels::{
    humanize_data_type, resolve_dialog_labels_with_name, DialogLabels, DialogType,
};
use crate::form::{
    build_form_layout, check_data, seed_defaults, FormEvent, FormLayout, FormRenderOptions,
    FormSource,
};
use crate::model::schema::{DataMap, Schema, SimplifiedSchema};
use crate::schema::merge::{merge_with_mode, MergeMode};
use crate::schema::registry::{DataProvider, SchemaProvider};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Key stripped from the working copy when a record is cloned.
pub const IDENTITY_KEY: &str = "id";

/// Shared, read-only schema lookup handed to dialogs.
pub type SharedSchemaProvider = Arc<dyn SchemaProvider + Send + Sync>;
/// Shared, read-only entity lookup handed to dialogs.
pub type SharedDataProvider = Arc<dyn DataProvider + Send + Sync>;

/// What `cancel()` does to the working copy before closing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelBehavior {
    /// Restore the working copy to `initial_data`.
    #[default]
    Revert,
    /// Leave the working copy as edited.
    Discard,
}

/// Policy knobs for one dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogOptions {
    pub diagnostics: DiagnosticsMode,
    pub cancel_behavior: CancelBehavior,
    pub render: FormRenderOptions,
    /// Seed `add` dialogs opened without data from schema defaults.
    pub seed_defaults: bool,
}

impl DialogOptions {
    pub fn merge_mode(&self) -> MergeMode {
        match self.diagnostics {
            DiagnosticsMode::Strict => MergeMode::Strict,
            DiagnosticsMode::Silent | DiagnosticsMode::Warn => MergeMode::Lenient,
        }
    }
}

/// Request to open a dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub dialog_type: DialogType,
    pub data_type: String,
    #[serde(default)]
    pub data: Option<DataMap>,
    #[serde(default)]
    pub initial_data: Option<DataMap>,
}

impl OpenRequest {
    pub fn new(dialog_type: DialogType, data_type: impl Into<String>) -> Self {
        Self {
            dialog_type,
            data_type: data_type.into(),
            data: None,
            initial_data: None,
        }
    }

    pub fn with_data(mut self, data: DataMap) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_initial_data(mut self, initial_data: DataMap) -> Self {
        self.initial_data = Some(initial_data);
        self
    }
}

/// Live record of one open (or handler-retained) dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRecord {
    pub dialog_id: Uuid,
    pub dialog_type: DialogType,
    pub data_type: String,
    pub data: Option<DataMap>,
    pub initial_data: Option<DataMap>,
    pub dialog_open: bool,
}

/// Coarse dialog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open {
        dialog_type: DialogType,
        data_type: String,
    },
}

/// Payload handed to `DialogHandler::handle_submit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub dialog_id: Uuid,
    pub dialog_type: DialogType,
    pub data_type: String,
    pub payload: DataMap,
}

/// Caller-owned callbacks for one dialog.
///
/// Only `handle_submit` is mandatory; the other methods carry the default
/// behavior of an uncustomized dialog.
pub trait DialogHandler {
    /// Receives the submitted record. Failures are the caller's to handle.
    fn handle_submit(&mut self, submission: Submission);

    /// Produces the next working copy after one field change.
    ///
    /// Default: shallow merge of `name = value` into a copy of `data`.
    fn handle_change(&mut self, name: &str, value: Value, data: &DataMap) -> DataMap {
        let mut next = data.clone();
        next.insert(name.to_string(), value);
        next
    }

    /// Observes a close. Return `true` to keep the record (closed) instead
    /// of the default reset.
    fn handle_close(&mut self, _record: &DialogRecord) -> bool {
        false
    }
}

/// Renderable snapshot of an open dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogView {
    pub dialog_id: Uuid,
    pub dialog_type: DialogType,
    pub data_type: String,
    pub labels: DialogLabels,
    /// `None` when no schema could be resolved.
    pub form: Option<FormLayout>,
    /// Inline, non-fatal warnings for the dialog body.
    pub warnings: Vec<FormDiagnostic>,
    /// Fields edited in this session, for display only.
    pub form_data: Option<DataMap>,
}

/// Generic dialog wrapper around a schema-driven form.
pub struct DialogWrapper<H: DialogHandler> {
    schemas: SharedSchemaProvider,
    data: SharedDataProvider,
    handler: H,
    options: DialogOptions,
    explicit_schema: Option<Schema>,
    simplified: Option<SimplifiedSchema>,
    preset: Option<String>,
    record: Option<DialogRecord>,
    form_data: Option<DataMap>,
    diagnostics: Vec<FormDiagnostic>,
}

impl<H: DialogHandler> DialogWrapper<H> {
    /// Creates a closed dialog wired to the given providers and handler.
    pub fn new(
        schemas: SharedSchemaProvider,
        data: SharedDataProvider,
        handler: H,
        options: DialogOptions,
    ) -> Self {
        Self {
            schemas,
            data,
            handler,
            options,
            explicit_schema: None,
            simplified: None,
            preset: None,
            record: None,
            form_data: None,
            diagnostics: Vec::new(),
        }
    }

    /// Uses `schema` instead of looking one up by data type.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.explicit_schema = Some(schema);
        self
    }

    /// Narrows or re-configures the schema for this dialog.
    pub fn with_simplified_schema(mut self, simplified: SimplifiedSchema) -> Self {
        self.simplified = Some(simplified);
        self
    }

    /// Uses a named preset from the schema provider as simplified schema.
    ///
    /// An explicit simplified schema takes precedence over a preset.
    pub fn with_preset(mut self, preset_name: impl Into<String>) -> Self {
        self.preset = Some(preset_name.into());
        self
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn state(&self) -> DialogState {
        match &self.record {
            Some(record) if record.dialog_open => DialogState::Open {
                dialog_type: record.dialog_type,
                data_type: record.data_type.clone(),
            },
            _ => DialogState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.record.as_ref().is_some_and(|record| record.dialog_open)
    }

    /// Current record; also present after a handler-retained close.
    pub fn record(&self) -> Option<&DialogRecord> {
        self.record.as_ref()
    }

    /// Working copy of the open dialog.
    pub fn data(&self) -> Option<&DataMap> {
        self.record.as_ref().and_then(|record| record.data.as_ref())
    }

    /// Display-only buffer of fields edited in this session.
    pub fn form_data(&self) -> Option<&DataMap> {
        self.form_data.as_ref()
    }

    /// Diagnostics recorded under `Warn`/`Strict` mode.
    pub fn diagnostics(&self) -> &[FormDiagnostic] {
        &self.diagnostics
    }

    /// Opens the dialog, replacing any previous record.
    ///
    /// The working copy is `request.data`, else a copy of
    /// `request.initial_data`, else (for `add` with `seed_defaults`) schema
    /// defaults. `clone` dialogs drop the identity key from the copy.
    /// Opening with `DialogType::Close` closes the dialog instead.
    pub fn open(&mut self, request: OpenRequest) -> Result<Uuid, DialogError> {
        if request.dialog_type == DialogType::Close {
            let closed_id = self
                .record
                .as_ref()
                .filter(|record| record.dialog_open)
                .map(|record| record.dialog_id);
            self.close();
            return closed_id.ok_or(DialogError::NotOpen);
        }

        if let Some(previous) = self.record.as_ref().filter(|record| record.dialog_open) {
            debug!(
                "event=dialog_open module=dialog status=replaced dialog_id={}",
                previous.dialog_id
            );
        }

        let data_type = request.data_type.trim().to_string();
        let mut data = request.data.or_else(|| request.initial_data.clone());
        if data.is_none() && request.dialog_type == DialogType::Add && self.options.seed_defaults {
            data = self.resolve_base_schema(&data_type).map(|schema| seed_defaults(&schema));
        }
        if request.dialog_type == DialogType::Clone {
            if let Some(data) = data.as_mut() {
                data.remove(IDENTITY_KEY);
            }
        }

        let dialog_id = Uuid::new_v4();
        info!(
            "event=dialog_open module=dialog status=ok dialog_id={} dialog_type={} data_type={} fields={}",
            dialog_id,
            request.dialog_type.as_str(),
            data_type,
            data.as_ref().map_or(0, DataMap::len)
        );

        self.record = Some(DialogRecord {
            dialog_id,
            dialog_type: request.dialog_type,
            data_type,
            data,
            initial_data: request.initial_data,
            dialog_open: true,
        });
        self.form_data = None;
        self.diagnostics.clear();
        Ok(dialog_id)
    }

    /// Applies one field change to the working copy.
    ///
    /// Writes to keys absent from the working copy, and writes in read-only
    /// dialogs, are dropped; `Strict` mode turns them into errors.
    pub fn change_field(&mut self, name: &str, value: Value) -> Result<(), DialogError> {
        if !self.is_open() {
            return Err(DialogError::NotOpen);
        }
        if let Some((diagnostic, err)) = self.write_rejection(name) {
            return self.reject(diagnostic, err);
        }
        self.write_field(name, value);
        Ok(())
    }

    /// Applies a whole updated object field by field.
    ///
    /// Under `Strict` mode every key is checked before anything is written,
    /// so a rejected update leaves the working copy untouched.
    pub fn apply_update(&mut self, update: DataMap) -> Result<(), DialogError> {
        if !self.is_open() {
            return Err(DialogError::NotOpen);
        }
        if self.options.diagnostics == DiagnosticsMode::Strict {
            let rejection = update.keys().find_map(|name| self.write_rejection(name));
            if let Some((diagnostic, err)) = rejection {
                return self.reject(diagnostic, err);
            }
        }
        for (name, value) in update {
            self.change_field(&name, value)?;
        }
        Ok(())
    }

    /// Dispatches one event reported by the rendered form.
    pub fn handle_event(&mut self, event: FormEvent) -> Result<(), DialogError> {
        match event {
            FormEvent::Change { name, value } => self.change_field(&name, value),
            FormEvent::Update { data } => self.apply_update(data),
            FormEvent::Submit => self.submit(),
        }
    }

    /// Hands the working copy (or `initial_data`) to the handler.
    pub fn submit(&mut self) -> Result<(), DialogError> {
        let Some(record) = self.record.as_ref().filter(|record| record.dialog_open) else {
            return Err(DialogError::NotOpen);
        };

        let (payload, source) = match (&record.data, &record.initial_data) {
            (Some(data), _) => (data.clone(), "data"),
            (None, Some(initial)) => (initial.clone(), "initial_data"),
            (None, None) => (DataMap::new(), "empty"),
        };
        info!(
            "event=dialog_submit module=dialog status=ok dialog_id={} dialog_type={} data_type={} source={} fields={}",
            record.dialog_id,
            record.dialog_type.as_str(),
            record.data_type,
            source,
            payload.len()
        );

        let submission = Submission {
            dialog_id: record.dialog_id,
            dialog_type: record.dialog_type,
            data_type: record.data_type.clone(),
            payload,
        };
        self.handler.handle_submit(submission);
        Ok(())
    }

    /// Closes the dialog. Closing a closed dialog is a no-op.
    pub fn close(&mut self) {
        let Some(record) = self.record.as_mut().filter(|record| record.dialog_open) else {
            return;
        };
        record.dialog_open = false;
        let dialog_id = record.dialog_id;

        let retained = self.handler.handle_close(record);
        self.form_data = None;
        if !retained {
            self.record = None;
        }
        info!(
            "event=dialog_close module=dialog status=ok dialog_id={} retained={}",
            dialog_id, retained
        );
    }

    /// Closes without submitting, reverting first unless configured not to.
    pub fn cancel(&mut self) {
        let Some(record) = self.record.as_mut().filter(|record| record.dialog_open) else {
            return;
        };
        if self.options.cancel_behavior == CancelBehavior::Revert {
            record.data = record.initial_data.clone();
        }
        info!(
            "event=dialog_cancel module=dialog status=ok dialog_id={} behavior={:?}",
            record.dialog_id, self.options.cancel_behavior
        );
        self.close();
    }

    /// Switches an open dialog to another type, keeping its working copy.
    pub fn switch_type(&mut self, dialog_type: DialogType) -> Result<(), DialogError> {
        if dialog_type == DialogType::Close {
            self.close();
            return Ok(());
        }
        let Some(record) = self.record.as_mut().filter(|record| record.dialog_open) else {
            return Err(DialogError::NotOpen);
        };
        debug!(
            "event=dialog_switch module=dialog status=ok dialog_id={} from={} to={}",
            record.dialog_id,
            record.dialog_type.as_str(),
            dialog_type.as_str()
        );
        record.dialog_type = dialog_type;
        Ok(())
    }

    /// Effective schema for the open dialog, or `None` when unresolvable.
    ///
    /// # Errors
    /// - `DialogError::Schema` when `Strict` mode finds an unmatched
    ///   simplified-schema key.
    pub fn effective_schema(&self) -> Result<Option<Schema>, DialogError> {
        Ok(self.resolve_effective()?.map(|(schema, _)| schema))
    }

    /// Builds the renderable view of the open dialog.
    ///
    /// Returns `Ok(None)` when the dialog is closed. A missing schema omits
    /// the form and adds a `MissingSchema` warning instead of failing.
    pub fn view(&self) -> Result<Option<DialogView>, DialogError> {
        let Some(record) = self.record.as_ref().filter(|record| record.dialog_open) else {
            return Ok(None);
        };

        let labels = self.labels_for(record);

        let mut warnings = self.diagnostics.clone();
        let form = match self.resolve_effective()? {
            Some((schema, dropped_keys)) => {
                if self.options.diagnostics.records() {
                    warnings.extend(
                        dropped_keys
                            .into_iter()
                            .map(|field| FormDiagnostic::DroppedSimplifiedSchemaKey { field }),
                    );
                }
                if let Some(data) = record.data.as_ref().or(record.initial_data.as_ref()) {
                    warnings.extend(check_data(&schema, data));
                }
                let focus = self.resolve_simplified(&record.data_type);
                let source = FormSource {
                    schema: &schema,
                    data: record.data.as_ref(),
                    initial_data: record.initial_data.as_ref(),
                    focus: focus.as_ref(),
                    read_only: record.dialog_type.is_read_only(),
                };
                Some(build_form_layout(&source, &self.options.render, &*self.data))
            }
            None => {
                warn!(
                    "event=schema_resolve module=dialog status=missing dialog_id={} data_type={}",
                    record.dialog_id, record.data_type
                );
                warnings.push(FormDiagnostic::MissingSchema {
                    data_type: record.data_type.clone(),
                });
                None
            }
        };

        Ok(Some(DialogView {
            dialog_id: record.dialog_id,
            dialog_type: record.dialog_type,
            data_type: record.data_type.clone(),
            labels,
            form,
            warnings,
            form_data: self.form_data.clone(),
        }))
    }

    /// Labels of the open dialog.
    pub fn labels(&self) -> Option<DialogLabels> {
        self.record
            .as_ref()
            .filter(|record| record.dialog_open)
            .map(|record| self.labels_for(record))
    }

    fn labels_for(&self, record: &DialogRecord) -> DialogLabels {
        let entity_name = self
            .schemas
            .display_name(&record.data_type)
            .unwrap_or_else(|| humanize_data_type(&record.data_type));
        resolve_dialog_labels_with_name(record.dialog_type, &entity_name)
    }

    fn resolve_base_schema(&self, data_type: &str) -> Option<Schema> {
        self.explicit_schema
            .clone()
            .or_else(|| self.schemas.schema(data_type))
    }

    fn resolve_simplified(&self, data_type: &str) -> Option<SimplifiedSchema> {
        self.simplified.clone().or_else(|| {
            self.preset
                .as_deref()
                .and_then(|preset| self.schemas.preset(data_type, preset))
        })
    }

    fn resolve_effective(&self) -> Result<Option<(Schema, Vec<String>)>, DialogError> {
        let Some(record) = self.record.as_ref() else {
            return Ok(None);
        };
        let Some(base) = self.resolve_base_schema(&record.data_type) else {
            return Ok(None);
        };
        let simplified = self.resolve_simplified(&record.data_type);
        let report = merge_with_mode(&base, simplified.as_ref(), self.options.merge_mode())?;
        Ok(Some((report.schema, report.dropped_keys)))
    }

    fn write_rejection(&self, name: &str) -> Option<(FormDiagnostic, DialogError)> {
        let record = self.record.as_ref()?;
        if record.dialog_type.is_read_only() {
            let dialog_type = record.dialog_type;
            return Some((
                FormDiagnostic::ReadOnlyWrite {
                    field: name.to_string(),
                    dialog_type,
                },
                DialogError::ReadOnly(dialog_type),
            ));
        }
        let known = record
            .data
            .as_ref()
            .is_some_and(|data| data.contains_key(name));
        if known {
            return None;
        }
        Some((
            FormDiagnostic::UnknownFieldWrite {
                field: name.to_string(),
            },
            DialogError::UnknownField(name.to_string()),
        ))
    }

    fn write_field(&mut self, name: &str, value: Value) {
        let Some(record) = self.record.as_mut() else {
            return;
        };
        let Some(current) = record.data.as_ref() else {
            return;
        };
        let next = self.handler.handle_change(name, value.clone(), current);
        debug!(
            "event=dialog_change module=dialog status=ok dialog_id={} field={}",
            record.dialog_id, name
        );
        record.data = Some(next);
        self.form_data
            .get_or_insert_with(DataMap::new)
            .insert(name.to_string(), value);
    }

    fn reject(&mut self, diagnostic: FormDiagnostic, err: DialogError) -> Result<(), DialogError> {
        match self.options.diagnostics {
            DiagnosticsMode::Silent => {
                debug!("event=dialog_change module=dialog status=dropped reason=\"{diagnostic}\"");
                Ok(())
            }
            DiagnosticsMode::Warn => {
                warn!("event=dialog_change module=dialog status=dropped reason=\"{diagnostic}\"");
                self.diagnostics.push(diagnostic);
                Ok(())
            }
            DiagnosticsMode::Strict => {
                warn!("event=dialog_change module=dialog status=error reason=\"{diagnostic}\"");
                self.diagnostics.push(diagnostic);
                Err(err)
            }
        }
    }
}
