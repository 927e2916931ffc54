//! Dialog type enum and its display label bundles.
//!
//! Every dialog type maps to exactly one bundle through an exhaustive
//! `match`, so adding a variant without labels fails to compile.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary regex"));
static WORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_\-]+").expect("valid word separator regex"));

/// Kind of dialog a caller opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogType {
    Add,
    Edit,
    View,
    Delete,
    Clone,
    /// Request to close; opening with this type closes the dialog.
    Close,
}

impl DialogType {
    pub const ALL: [DialogType; 6] = [
        Self::Add,
        Self::Edit,
        Self::View,
        Self::Delete,
        Self::Clone,
        Self::Close,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::View => "view",
            Self::Delete => "delete",
            Self::Clone => "clone",
            Self::Close => "close",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "edit" => Some(Self::Edit),
            "view" => Some(Self::View),
            "delete" => Some(Self::Delete),
            "clone" => Some(Self::Clone),
            "close" => Some(Self::Close),
            _ => None,
        }
    }

    /// Whether the working copy may be edited in this dialog.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::View | Self::Delete | Self::Close)
    }

    fn bundle(self) -> LabelBundle {
        match self {
            Self::Add => LabelBundle {
                name: "Add",
                icon: "plus",
                description: "Create",
                close_label: "Cancel",
                submit_label: "Create",
                submit_icon: "check",
            },
            Self::Edit => LabelBundle {
                name: "Edit",
                icon: "pencil",
                description: "Update",
                close_label: "Cancel",
                submit_label: "Save",
                submit_icon: "save",
            },
            Self::View => LabelBundle {
                name: "View",
                icon: "eye",
                description: "Inspect",
                close_label: "Close",
                submit_label: "Done",
                submit_icon: "check",
            },
            Self::Delete => LabelBundle {
                name: "Delete",
                icon: "trash",
                description: "Remove",
                close_label: "Cancel",
                submit_label: "Delete",
                submit_icon: "trash",
            },
            Self::Clone => LabelBundle {
                name: "Clone",
                icon: "copy",
                description: "Duplicate",
                close_label: "Cancel",
                submit_label: "Clone",
                submit_icon: "copy",
            },
            Self::Close => LabelBundle {
                name: "Close",
                icon: "x",
                description: "Close",
                close_label: "Close",
                submit_label: "Close",
                submit_icon: "x",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LabelBundle {
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    close_label: &'static str,
    submit_label: &'static str,
    submit_icon: &'static str,
}

/// Display strings for one dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogLabels {
    pub title: String,
    pub description: String,
    pub icon: &'static str,
    pub close_label: &'static str,
    pub submit_label: &'static str,
    pub submit_icon: &'static str,
}

/// Resolves labels for a dialog over `data_type`.
///
/// `title` is "{Name} {Entity}" and `description` is
/// "{Description} {Entity}", where the entity is the humanized data type.
pub fn resolve_dialog_labels(dialog_type: DialogType, data_type: &str) -> DialogLabels {
    resolve_dialog_labels_with_name(dialog_type, &humanize_data_type(data_type))
}

/// Resolves labels using an already human-readable entity name.
pub fn resolve_dialog_labels_with_name(dialog_type: DialogType, entity_name: &str) -> DialogLabels {
    let bundle = dialog_type.bundle();
    let entity_name = entity_name.trim();
    DialogLabels {
        title: join_label(bundle.name, entity_name),
        description: join_label(bundle.description, entity_name),
        icon: bundle.icon,
        close_label: bundle.close_label,
        submit_label: bundle.submit_label,
        submit_icon: bundle.submit_icon,
    }
}

/// Turns a data type id into a title-cased entity name.
///
/// `task` -> `Task`, `time_log` -> `Time Log`, `journalEntry` -> `Journal Entry`.
pub fn humanize_data_type(data_type: &str) -> String {
    let spaced = CAMEL_BOUNDARY_RE.replace_all(data_type.trim(), "$1 $2");
    WORD_SEPARATOR_RE
        .split(&spaced)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_label(prefix: &str, entity_name: &str) -> String {
    if entity_name.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {entity_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::{humanize_data_type, resolve_dialog_labels, DialogType};

    #[test]
    fn add_task_labels() {
        let labels = resolve_dialog_labels(DialogType::Add, "task");
        assert_eq!(labels.title, "Add Task");
        assert_eq!(labels.description, "Create Task");
        assert_eq!(labels.close_label, "Cancel");
        assert_eq!(labels.submit_label, "Create");
    }

    #[test]
    fn every_dialog_type_has_labels() {
        for dialog_type in DialogType::ALL {
            let labels = resolve_dialog_labels(dialog_type, "log");
            assert!(labels.title.ends_with(" Log"), "{labels:?}");
            assert!(!labels.icon.is_empty());
            assert!(!labels.submit_label.is_empty());
            assert_eq!(DialogType::parse(dialog_type.as_str()), Some(dialog_type));
        }
    }

    #[test]
    fn humanizes_snake_kebab_and_camel_case() {
        assert_eq!(humanize_data_type("task"), "Task");
        assert_eq!(humanize_data_type("time_log"), "Time Log");
        assert_eq!(humanize_data_type("journalEntry"), "Journal Entry");
        assert_eq!(humanize_data_type(" habit-check "), "Habit Check");
        assert_eq!(humanize_data_type(""), "");
    }

    #[test]
    fn blank_entity_name_leaves_bare_labels() {
        let labels = resolve_dialog_labels(DialogType::Delete, "  ");
        assert_eq!(labels.title, "Delete");
        assert_eq!(labels.description, "Remove");
    }
}
