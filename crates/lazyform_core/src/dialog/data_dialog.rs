//! CRUD dialog with fixed action buttons.
//!
//! # Responsibility
//! - Offer the action set that matches the dialog type.
//! - Dispatch triggered actions onto the underlying `DialogWrapper`.
//!
//! # Invariants
//! - Only offered actions can be triggered.
//! - `view` dialogs switch to `edit` in place, keeping the working copy.

use crate::diagnostics::DialogError;
use crate::dialog::labels::{DialogLabels, DialogType};
use crate::dialog::wrapper::{
    DialogHandler, DialogOptions, DialogState, DialogView, DialogWrapper, OpenRequest,
    SharedDataProvider, SharedSchemaProvider,
};
use crate::form::FormEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// What a dialog button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Cancel,
    Submit,
    Edit,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Submit => "submit",
            Self::Edit => "edit",
        }
    }
}

/// One dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DialogAction {
    pub kind: ActionKind,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Data dialog view: the wrapper view plus its buttons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDialogView {
    #[serde(flatten)]
    pub dialog: DialogView,
    pub actions: Vec<DialogAction>,
}

/// Returns the fixed action set for `dialog_type`.
pub fn actions_for(dialog_type: DialogType, labels: &DialogLabels) -> Vec<DialogAction> {
    let cancel = DialogAction {
        kind: ActionKind::Cancel,
        label: labels.close_label,
        icon: "x",
    };
    match dialog_type {
        DialogType::Close => Vec::new(),
        DialogType::View => vec![
            cancel,
            DialogAction {
                kind: ActionKind::Edit,
                label: "Edit",
                icon: "pencil",
            },
        ],
        DialogType::Add | DialogType::Edit | DialogType::Delete | DialogType::Clone => vec![
            cancel,
            DialogAction {
                kind: ActionKind::Submit,
                label: labels.submit_label,
                icon: labels.submit_icon,
            },
        ],
    }
}

/// CRUD-flavored dialog built on `DialogWrapper`.
pub struct DataDialog<H: DialogHandler> {
    inner: DialogWrapper<H>,
}

impl<H: DialogHandler> DataDialog<H> {
    pub fn new(
        schemas: SharedSchemaProvider,
        data: SharedDataProvider,
        handler: H,
        options: DialogOptions,
    ) -> Self {
        Self::from_wrapper(DialogWrapper::new(schemas, data, handler, options))
    }

    /// Wraps an already configured dialog (explicit schema, preset, ...).
    pub fn from_wrapper(inner: DialogWrapper<H>) -> Self {
        Self { inner }
    }

    pub fn wrapper(&self) -> &DialogWrapper<H> {
        &self.inner
    }

    pub fn wrapper_mut(&mut self) -> &mut DialogWrapper<H> {
        &mut self.inner
    }

    pub fn open(&mut self, request: OpenRequest) -> Result<Uuid, DialogError> {
        self.inner.open(request)
    }

    pub fn change_field(&mut self, name: &str, value: Value) -> Result<(), DialogError> {
        self.inner.change_field(name, value)
    }

    pub fn handle_event(&mut self, event: FormEvent) -> Result<(), DialogError> {
        self.inner.handle_event(event)
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Actions offered by the open dialog; empty when closed.
    pub fn actions(&self) -> Vec<DialogAction> {
        match (self.inner.state(), self.inner.labels()) {
            (DialogState::Open { dialog_type, .. }, Some(labels)) => {
                actions_for(dialog_type, &labels)
            }
            _ => Vec::new(),
        }
    }

    /// Runs one offered action.
    ///
    /// # Errors
    /// - `DialogError::NotOpen` when the dialog is closed.
    /// - `DialogError::UnavailableAction` when the action is not offered.
    pub fn trigger(&mut self, kind: ActionKind) -> Result<(), DialogError> {
        if !self.inner.is_open() {
            return Err(DialogError::NotOpen);
        }
        if !self.actions().iter().any(|action| action.kind == kind) {
            return Err(DialogError::UnavailableAction(kind.as_str()));
        }
        match kind {
            ActionKind::Cancel => {
                self.inner.cancel();
                Ok(())
            }
            ActionKind::Submit => self.inner.submit(),
            ActionKind::Edit => self.inner.switch_type(DialogType::Edit),
        }
    }

    /// Submits and, on success, closes the dialog.
    pub fn submit_and_close(&mut self) -> Result<(), DialogError> {
        self.trigger(ActionKind::Submit)?;
        self.inner.close();
        Ok(())
    }

    pub fn view(&self) -> Result<Option<DataDialogView>, DialogError> {
        Ok(self.inner.view()?.map(|dialog| DataDialogView {
            actions: actions_for(dialog.dialog_type, &dialog.labels),
            dialog,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{actions_for, ActionKind};
    use crate::dialog::labels::{resolve_dialog_labels, DialogType};

    #[test]
    fn view_offers_edit_instead_of_submit() {
        let labels = resolve_dialog_labels(DialogType::View, "note");
        let kinds: Vec<ActionKind> = actions_for(DialogType::View, &labels)
            .iter()
            .map(|action| action.kind)
            .collect();
        assert_eq!(kinds, vec![ActionKind::Cancel, ActionKind::Edit]);
    }

    #[test]
    fn submit_button_uses_dialog_labels() {
        let labels = resolve_dialog_labels(DialogType::Delete, "note");
        let actions = actions_for(DialogType::Delete, &labels);
        assert_eq!(actions[0].label, "Cancel");
        assert_eq!(actions[1].kind, ActionKind::Submit);
        assert_eq!(actions[1].label, "Delete");
        assert_eq!(actions[1].icon, "trash");
    }
}
