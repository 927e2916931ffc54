//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose schema merge, label resolution and dialog sessions to Dart via FRB.
//! - Exchange schemas, records and views as JSON strings.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes, never thrown.
//! - Sessions live until `dialog_dispose`; closing a dialog keeps its session.

use lazyform_core::db::open_db;
use lazyform_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, merge_with_mode,
    ping as ping_inner, resolve_dialog_labels, ActionKind, DataDialog, DialogHandler,
    DialogOptions, DialogType, DialogWrapper, MergeMode, NoData, OpenRequest, Schema,
    SimplifiedSchema, SqliteSchemaRepository, Submission,
};
use log::{info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

const SCHEMA_DB_FILE_NAME: &str = "lazyform_schemas.sqlite3";
static SCHEMA_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSIONS: OnceLock<Mutex<HashMap<Uuid, DataDialog<CollectingHandler>>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActionResponse {
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl FormActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Result of `merge_schema_json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMergeResponse {
    pub ok: bool,
    /// Effective schema as JSON; `None` on failure.
    pub schema_json: Option<String>,
    /// Simplified keys with no base field.
    pub dropped_keys: Vec<String>,
    pub message: String,
}

/// Display strings for one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLabelsResponse {
    pub ok: bool,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub close_label: String,
    pub submit_label: String,
    pub submit_icon: String,
    pub message: String,
}

/// Dialog session state after one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSessionResponse {
    pub ok: bool,
    pub session_id: Option<String>,
    pub dialog_open: bool,
    /// Serialized `DataDialogView`; `None` when closed or on failure.
    pub view_json: Option<String>,
    pub message: String,
}

impl DialogSessionResponse {
    fn failure(session_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            session_id,
            dialog_open: false,
            view_json: None,
            message: message.into(),
        }
    }
}

/// Submissions drained from one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionsResponse {
    pub ok: bool,
    /// One serialized `Submission` per submit, oldest first.
    pub submissions_json: Vec<String>,
    pub message: String,
}

/// Merges a simplified schema onto a full schema.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - `strict=true` fails on simplified keys with no base field.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn merge_schema_json(
    full_json: String,
    simplified_json: Option<String>,
    strict: bool,
) -> SchemaMergeResponse {
    let failure = |message: String| SchemaMergeResponse {
        ok: false,
        schema_json: None,
        dropped_keys: Vec::new(),
        message,
    };

    let full = match serde_json::from_str::<Schema>(&full_json) {
        Ok(schema) => schema,
        Err(err) => return failure(format!("merge_schema_json failed: full schema: {err}")),
    };
    let simplified = match simplified_json.as_deref().map(parse_simplified).transpose() {
        Ok(simplified) => simplified.flatten(),
        Err(err) => return failure(format!("merge_schema_json failed: {err}")),
    };
    let mode = if strict {
        MergeMode::Strict
    } else {
        MergeMode::Lenient
    };

    let report = match merge_with_mode(&full, simplified.as_ref(), mode) {
        Ok(report) => report,
        Err(err) => return failure(format!("merge_schema_json failed: {err}")),
    };
    match serde_json::to_string(&report.schema) {
        Ok(schema_json) => SchemaMergeResponse {
            ok: true,
            schema_json: Some(schema_json),
            message: format!("Merged {} field(s).", report.schema.len()),
            dropped_keys: report.dropped_keys,
        },
        Err(err) => failure(format!("merge_schema_json failed: {err}")),
    }
}

/// Resolves dialog labels for `dialog_type` over `data_type`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Unknown dialog types return `ok=false` with empty labels.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_labels(dialog_type: String, data_type: String) -> DialogLabelsResponse {
    let Some(kind) = DialogType::parse(&dialog_type) else {
        return DialogLabelsResponse {
            ok: false,
            title: String::new(),
            description: String::new(),
            icon: String::new(),
            close_label: String::new(),
            submit_label: String::new(),
            submit_icon: String::new(),
            message: format!("unsupported dialog type `{}`", dialog_type.trim()),
        };
    };
    let labels = resolve_dialog_labels(kind, &data_type);
    DialogLabelsResponse {
        ok: true,
        title: labels.title,
        description: labels.description,
        icon: labels.icon.to_string(),
        close_label: labels.close_label.to_string(),
        submit_label: labels.submit_label.to_string(),
        submit_icon: labels.submit_icon.to_string(),
        message: String::new(),
    }
}

/// Stores (or replaces) the schema for `data_type` in the schema store.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn schema_store_put(
    data_type: String,
    display_name: Option<String>,
    schema_json: String,
) -> FormActionResponse {
    let schema = match serde_json::from_str::<Schema>(&schema_json) {
        Ok(schema) => schema,
        Err(err) => return FormActionResponse::failure(format!("schema_store_put failed: {err}")),
    };
    let result = with_schema_repo(|repo| {
        repo.upsert_schema(&data_type, display_name.as_deref(), &schema)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => FormActionResponse::success("Schema saved."),
        Err(err) => FormActionResponse::failure(format!("schema_store_put failed: {err}")),
    }
}

/// Stores (or replaces) a named simplified-schema preset.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Fails when no schema is stored for `data_type`.
#[flutter_rust_bridge::frb(sync)]
pub fn schema_store_put_preset(
    data_type: String,
    preset_name: String,
    settings_json: String,
) -> FormActionResponse {
    let preset = match serde_json::from_str::<SimplifiedSchema>(&settings_json) {
        Ok(preset) => preset,
        Err(err) => {
            return FormActionResponse::failure(format!("schema_store_put_preset failed: {err}"))
        }
    };
    let result = with_schema_repo(|repo| {
        repo.upsert_preset(&data_type, &preset_name, &preset)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => FormActionResponse::success("Preset saved."),
        Err(err) => FormActionResponse::failure(format!("schema_store_put_preset failed: {err}")),
    }
}

/// Opens a dialog session backed by the schema store.
///
/// Input semantics:
/// - `data_json` / `initial_data_json`: JSON objects or `None`.
/// - `options_json`: serialized `DialogOptions`; `None` uses defaults.
/// - `preset`: name of a stored preset used as simplified schema.
///
/// # FFI contract
/// - Sync call; loads the schema store once per session.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_open(
    dialog_type: String,
    data_type: String,
    data_json: Option<String>,
    initial_data_json: Option<String>,
    options_json: Option<String>,
    preset: Option<String>,
) -> DialogSessionResponse {
    match open_session(
        &dialog_type,
        data_type,
        data_json.as_deref(),
        initial_data_json.as_deref(),
        options_json.as_deref(),
        preset,
    ) {
        Ok(response) => response,
        Err(err) => DialogSessionResponse::failure(None, format!("dialog_open failed: {err}")),
    }
}

/// Applies one field change; `value_json` is any JSON value.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_change(
    session_id: String,
    name: String,
    value_json: String,
) -> DialogSessionResponse {
    let value = match serde_json::from_str::<Value>(&value_json) {
        Ok(value) => value,
        Err(err) => {
            return DialogSessionResponse::failure(
                Some(session_id),
                format!("dialog_change failed: {err}"),
            )
        }
    };
    with_session(&session_id, "dialog_change", |dialog| {
        dialog.change_field(&name, value).map_err(|err| err.to_string())
    })
}

/// Runs one dialog action: `cancel`, `submit` or `edit`.
///
/// Submitted payloads are queued until `dialog_take_submissions`.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_trigger(session_id: String, action: String) -> DialogSessionResponse {
    let kind = match action.trim().to_ascii_lowercase().as_str() {
        "cancel" => ActionKind::Cancel,
        "submit" => ActionKind::Submit,
        "edit" => ActionKind::Edit,
        other => {
            return DialogSessionResponse::failure(
                Some(session_id),
                format!("dialog_trigger failed: unsupported action `{other}`"),
            )
        }
    };
    with_session(&session_id, "dialog_trigger", |dialog| {
        dialog.trigger(kind).map_err(|err| err.to_string())
    })
}

/// Closes the dialog without cancelling; the session stays alive.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_close(session_id: String) -> DialogSessionResponse {
    with_session(&session_id, "dialog_close", |dialog| {
        dialog.wrapper_mut().close();
        Ok(())
    })
}

/// Returns the current view of one session.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_view(session_id: String) -> DialogSessionResponse {
    with_session(&session_id, "dialog_view", |_| Ok(()))
}

/// Drains queued submissions of one session.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_take_submissions(session_id: String) -> SubmissionsResponse {
    let failure = |message: String| SubmissionsResponse {
        ok: false,
        submissions_json: Vec::new(),
        message,
    };
    let Ok(id) = Uuid::parse_str(session_id.trim()) else {
        return failure("dialog_take_submissions failed: invalid session id".to_string());
    };
    let Ok(mut sessions) = sessions().lock() else {
        return failure("dialog_take_submissions failed: session table unavailable".to_string());
    };
    let Some(dialog) = sessions.get_mut(&id) else {
        return failure(format!("dialog_take_submissions failed: unknown session {id}"));
    };

    let drained = std::mem::take(&mut dialog.wrapper_mut().handler_mut().submissions);
    let mut submissions_json = Vec::with_capacity(drained.len());
    for submission in &drained {
        match serde_json::to_string(submission) {
            Ok(json) => submissions_json.push(json),
            Err(err) => return failure(format!("dialog_take_submissions failed: {err}")),
        }
    }
    SubmissionsResponse {
        ok: true,
        message: format!("Took {} submission(s).", submissions_json.len()),
        submissions_json,
    }
}

/// Drops one session. Unknown sessions report `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn dialog_dispose(session_id: String) -> FormActionResponse {
    let Ok(id) = Uuid::parse_str(session_id.trim()) else {
        return FormActionResponse::failure("dialog_dispose failed: invalid session id");
    };
    let Ok(mut sessions) = sessions().lock() else {
        return FormActionResponse::failure("dialog_dispose failed: session table unavailable");
    };
    match sessions.remove(&id) {
        Some(_) => {
            info!("event=dialog_dispose module=ffi status=ok session_id={id}");
            FormActionResponse::success("Session disposed.")
        }
        None => FormActionResponse::failure(format!("dialog_dispose failed: unknown session {id}")),
    }
}

/// Queues submissions for the host to drain.
#[derive(Debug, Default)]
struct CollectingHandler {
    submissions: Vec<Submission>,
}

impl DialogHandler for CollectingHandler {
    fn handle_submit(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }
}

fn open_session(
    dialog_type: &str,
    data_type: String,
    data_json: Option<&str>,
    initial_data_json: Option<&str>,
    options_json: Option<&str>,
    preset: Option<String>,
) -> Result<DialogSessionResponse, String> {
    let kind = DialogType::parse(dialog_type)
        .ok_or_else(|| format!("unsupported dialog type `{}`", dialog_type.trim()))?;
    if kind == DialogType::Close {
        return Err("cannot open a session with dialog type `close`".to_string());
    }
    let options = match options_json {
        Some(json) => serde_json::from_str::<DialogOptions>(json).map_err(|err| err.to_string())?,
        None => DialogOptions::default(),
    };
    let mut request = OpenRequest::new(kind, data_type);
    request.data = data_json.map(parse_object).transpose()?;
    request.initial_data = initial_data_json.map(parse_object).transpose()?;

    let registry = with_schema_repo(|repo| repo.load_registry().map_err(|err| err.to_string()))?;
    let mut wrapper = DialogWrapper::new(
        Arc::new(registry),
        Arc::new(NoData),
        CollectingHandler::default(),
        options,
    );
    if let Some(preset) = preset.filter(|name| !name.trim().is_empty()) {
        wrapper = wrapper.with_preset(preset.trim());
    }
    let mut dialog = DataDialog::from_wrapper(wrapper);
    dialog.open(request).map_err(|err| err.to_string())?;

    let session_id = Uuid::new_v4();
    let response = session_response(session_id, &dialog)?;
    sessions()
        .lock()
        .map_err(|_| "session table unavailable".to_string())?
        .insert(session_id, dialog);
    info!("event=dialog_session_open module=ffi status=ok session_id={session_id}");
    Ok(response)
}

fn with_session(
    session_id: &str,
    operation: &str,
    f: impl FnOnce(&mut DataDialog<CollectingHandler>) -> Result<(), String>,
) -> DialogSessionResponse {
    let echoed_id = Some(session_id.trim().to_string());
    let Ok(id) = Uuid::parse_str(session_id.trim()) else {
        return DialogSessionResponse::failure(
            echoed_id,
            format!("{operation} failed: invalid session id"),
        );
    };
    let Ok(mut sessions) = sessions().lock() else {
        return DialogSessionResponse::failure(
            echoed_id,
            format!("{operation} failed: session table unavailable"),
        );
    };
    let Some(dialog) = sessions.get_mut(&id) else {
        return DialogSessionResponse::failure(
            echoed_id,
            format!("{operation} failed: unknown session {id}"),
        );
    };

    let outcome = f(dialog);
    if outcome.is_err() {
        warn!("event={operation} module=ffi status=error session_id={id}");
    }
    // Failed operations still report the live dialog state.
    match (outcome, session_response(id, dialog)) {
        (Ok(()), Ok(response)) => response,
        (Err(err), Ok(response)) => DialogSessionResponse {
            ok: false,
            message: format!("{operation} failed: {err}"),
            ..response
        },
        (Err(err), Err(_)) | (Ok(()), Err(err)) => DialogSessionResponse {
            dialog_open: dialog.is_open(),
            ..DialogSessionResponse::failure(echoed_id, format!("{operation} failed: {err}"))
        },
    }
}

fn session_response(
    session_id: Uuid,
    dialog: &DataDialog<CollectingHandler>,
) -> Result<DialogSessionResponse, String> {
    let view = dialog.view().map_err(|err| err.to_string())?;
    let view_json = view
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|err| err.to_string())?;
    Ok(DialogSessionResponse {
        ok: true,
        session_id: Some(session_id.to_string()),
        dialog_open: dialog.is_open(),
        view_json,
        message: String::new(),
    })
}

fn sessions() -> &'static Mutex<HashMap<Uuid, DataDialog<CollectingHandler>>> {
    SESSIONS.get_or_init(|| Mutex::new(HashMap::new()))
}

fn parse_object(json: &str) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_str::<Value>(json).map_err(|err| err.to_string())? {
        Value::Object(map) => Ok(map),
        _ => Err("record must be a JSON object".to_string()),
    }
}

fn parse_simplified(json: &str) -> Result<Option<SimplifiedSchema>, String> {
    let value = serde_json::from_str::<Value>(json).map_err(|err| err.to_string())?;
    SimplifiedSchema::from_value(&value).map_err(|err| format!("simplified schema: {err}"))
}

fn resolve_schema_db_path() -> PathBuf {
    SCHEMA_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LAZYFORM_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(SCHEMA_DB_FILE_NAME)
        })
        .clone()
}

fn with_schema_repo<T>(
    f: impl FnOnce(&SqliteSchemaRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_schema_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("schema DB open failed: {err}"))?;
    let repo = SqliteSchemaRepository::new(&conn);
    f(&repo)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, dialog_change, dialog_dispose, dialog_labels, dialog_open,
        dialog_take_submissions, dialog_trigger, dialog_view, init_logging, merge_schema_json,
        ping, schema_store_put, schema_store_put_preset,
    };
    use serde_json::{json, Value};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn merge_schema_json_reports_dropped_keys() {
        let full = json!({
            "title": {"type": "string"},
            "priority": {"type": "enum", "options": ["low", "high"]},
        });
        let simplified = json!({"priority": {"options": ["high"]}, "ghost": {"required": true}});

        let response = merge_schema_json(full.to_string(), Some(simplified.to_string()), false);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.dropped_keys, vec!["ghost".to_string()]);
        let merged: Value = serde_json::from_str(&response.schema_json.unwrap()).unwrap();
        assert_eq!(merged["priority"]["options"], json!(["high"]));

        let strict = merge_schema_json(full.to_string(), Some(simplified.to_string()), true);
        assert!(!strict.ok);
        assert!(strict.message.contains("ghost"));
    }

    #[test]
    fn merge_schema_json_rejects_malformed_input() {
        let response = merge_schema_json("not json".to_string(), None, false);
        assert!(!response.ok);
        assert!(response.schema_json.is_none());
    }

    #[test]
    fn dialog_labels_resolve_known_types() {
        let labels = dialog_labels("add".to_string(), "task".to_string());
        assert!(labels.ok);
        assert_eq!(labels.title, "Add Task");
        assert_eq!(labels.description, "Create Task");

        assert!(!dialog_labels("archive".to_string(), "task".to_string()).ok);
    }

    #[test]
    fn dialog_session_submits_edited_record() {
        let data_type = unique_data_type("task");
        let schema = json!({
            "title": {"type": "string", "required": true},
            "status": {"type": "enum", "options": ["todo", "done"]},
        });
        let saved = schema_store_put(data_type.clone(), None, schema.to_string());
        assert!(saved.ok, "{}", saved.message);

        let opened = dialog_open(
            "add".to_string(),
            data_type.clone(),
            None,
            Some(json!({"title": "", "status": "todo"}).to_string()),
            None,
            None,
        );
        assert!(opened.ok, "{}", opened.message);
        assert!(opened.dialog_open);
        let session_id = opened.session_id.clone().unwrap();
        let view: Value = serde_json::from_str(&opened.view_json.unwrap()).unwrap();
        assert_eq!(view["actions"][1]["kind"], json!("submit"));

        let changed = dialog_change(
            session_id.clone(),
            "title".to_string(),
            "\"Write docs\"".to_string(),
        );
        assert!(changed.ok, "{}", changed.message);

        let submitted = dialog_trigger(session_id.clone(), "submit".to_string());
        assert!(submitted.ok, "{}", submitted.message);

        let taken = dialog_take_submissions(session_id.clone());
        assert!(taken.ok);
        assert_eq!(taken.submissions_json.len(), 1);
        let submission: Value = serde_json::from_str(&taken.submissions_json[0]).unwrap();
        assert_eq!(submission["payload"], json!({"title": "Write docs", "status": "todo"}));

        let cancelled = dialog_trigger(session_id.clone(), "cancel".to_string());
        assert!(cancelled.ok);
        assert!(!cancelled.dialog_open);
        assert!(cancelled.view_json.is_none());

        assert!(dialog_dispose(session_id.clone()).ok);
        assert!(!dialog_view(session_id).ok);
    }

    #[test]
    fn dialog_session_uses_stored_preset() {
        let data_type = unique_data_type("ticket");
        let schema = json!({
            "title": {"type": "string"},
            "priority": {"type": "enum", "options": ["low", "high"]},
        });
        assert!(
            schema_store_put(
                data_type.clone(),
                Some("Ticket".to_string()),
                schema.to_string()
            )
            .ok
        );
        let preset = json!({"priority": {"options": ["high"]}});
        let saved =
            schema_store_put_preset(data_type.clone(), "triage".to_string(), preset.to_string());
        assert!(saved.ok, "{}", saved.message);

        let opened = dialog_open(
            "edit".to_string(),
            data_type,
            Some(json!({"title": "t", "priority": "high"}).to_string()),
            None,
            None,
            Some("triage".to_string()),
        );
        assert!(opened.ok, "{}", opened.message);
        let view: Value = serde_json::from_str(&opened.view_json.unwrap()).unwrap();
        assert_eq!(view["labels"]["title"], json!("Edit Ticket"));
        let priority = view["form"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|field| field["name"] == json!("priority"))
            .unwrap()
            .clone();
        assert_eq!(priority["options"], json!(["high"]));

        assert!(dialog_dispose(opened.session_id.unwrap()).ok);
    }

    #[test]
    fn rejected_change_keeps_reporting_open_dialog() {
        let data_type = unique_data_type("chore");
        let schema = json!({"title": {"type": "string"}});
        assert!(schema_store_put(data_type.clone(), None, schema.to_string()).ok);

        let opened = dialog_open(
            "edit".to_string(),
            data_type,
            Some(json!({"title": "x"}).to_string()),
            None,
            Some(json!({"diagnostics": "strict"}).to_string()),
            None,
        );
        assert!(opened.ok, "{}", opened.message);
        let session_id = opened.session_id.unwrap();

        let rejected = dialog_change(session_id.clone(), "ghost".to_string(), "1".to_string());
        assert!(!rejected.ok);
        assert!(rejected.message.contains("ghost"));
        assert!(rejected.dialog_open);
        assert_eq!(rejected.session_id.as_deref(), Some(session_id.as_str()));
        let view: Value = serde_json::from_str(&rejected.view_json.unwrap()).unwrap();
        assert_eq!(view["formData"], Value::Null);
        assert_eq!(view["warnings"][0]["kind"], json!("unknown_field_write"));

        assert!(dialog_view(session_id.clone()).dialog_open);
        assert!(dialog_dispose(session_id).ok);
    }

    #[test]
    fn dialog_open_rejects_unknown_type_and_non_object_data() {
        let response = dialog_open(
            "archive".to_string(),
            "task".to_string(),
            None,
            None,
            None,
            None,
        );
        assert!(!response.ok);
        assert!(response.session_id.is_none());

        let response = dialog_open(
            "edit".to_string(),
            "task".to_string(),
            Some("[1, 2]".to_string()),
            None,
            None,
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("JSON object"));
    }

    fn unique_data_type(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}_{nanos}")
    }
}
