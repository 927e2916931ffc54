//! Schema-to-control layout.
//!
//! # Responsibility
//! - Pick one control per schema field from field type, hints and options.
//! - Split fields into primary and optional groups in schema key order.
//!
//! # Invariants
//! - Output order equals schema key order within each group.
//! - Hidden fields and empty sequence entries never render.
//! - Read-only forms mark every control read-only.

use crate::form::options::FormRenderOptions;
use crate::model::field::{FieldDescriptor, FieldType};
use crate::model::schema::{DataMap, Schema, SimplifiedSchema};
use crate::schema::registry::{DataProvider, EntityRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input control rendered for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    TextInput,
    Select,
    NumberInput,
    Slider,
    Checkbox,
    Switch,
    DatePicker,
    DateRangePicker,
    DateList,
    TagInput,
    BadgeList,
    ObjectIdInput,
    MultiSelect,
    DecimalInput,
    Radial,
}

/// Picks the control for `descriptor` under `options`.
pub fn select_control(descriptor: &FieldDescriptor, options: &FormRenderOptions) -> ControlKind {
    let hints = &descriptor.hints;
    match descriptor.kind {
        FieldType::String if descriptor.options.is_empty() => ControlKind::TextInput,
        FieldType::String => ControlKind::Select,
        FieldType::Number => {
            if hints.slider.unwrap_or(options.use_sliders_for_numbers) {
                ControlKind::Slider
            } else {
                ControlKind::NumberInput
            }
        }
        FieldType::Boolean => {
            if hints.switch.unwrap_or(options.use_switches_for_boolean) {
                ControlKind::Switch
            } else {
                ControlKind::Checkbox
            }
        }
        FieldType::Date => ControlKind::DatePicker,
        FieldType::DateRange => {
            if options.use_date_range_for_date_arrays {
                ControlKind::DateRangePicker
            } else {
                ControlKind::DateList
            }
        }
        FieldType::ArrayOfString => {
            if hints.badges.unwrap_or(options.use_badges_for_string_arrays) {
                ControlKind::BadgeList
            } else {
                ControlKind::TagInput
            }
        }
        FieldType::ArrayOfObjectId => {
            if hints
                .multi_select
                .unwrap_or(options.use_multi_select_for_object_ids)
            {
                ControlKind::MultiSelect
            } else {
                ControlKind::ObjectIdInput
            }
        }
        FieldType::Enum => {
            if hints.multi_select.unwrap_or(false) {
                ControlKind::MultiSelect
            } else {
                ControlKind::Select
            }
        }
        FieldType::Decimal => {
            if hints.radial.unwrap_or(options.use_radial_for_decimals) {
                ControlKind::Radial
            } else {
                ControlKind::DecimalInput
            }
        }
    }
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldControl {
    pub name: String,
    pub label: String,
    pub control: ControlKind,
    pub field_type: FieldType,
    pub required: bool,
    pub read_only: bool,
    /// Entry was declared in sequence form.
    pub repeated: bool,
    pub options: Vec<String>,
    /// Selectable entities for object-id multi-selects.
    pub choices: Vec<EntityRef>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Current value: working copy first, then initial data, else null.
    pub value: Value,
}

/// Rendered form, split into primary and optional groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormLayout {
    pub fields: Vec<FieldControl>,
    pub optional: Vec<FieldControl>,
}

impl FormLayout {
    /// Field names across both groups, primary group first.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .chain(self.optional.iter())
            .map(|field| field.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldControl> {
        self.fields
            .iter()
            .chain(self.optional.iter())
            .find(|field| field.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.optional.is_empty()
    }
}

/// Inputs the generator reads; all borrowed from the dialog.
#[derive(Debug, Clone, Copy)]
pub struct FormSource<'a> {
    pub schema: &'a Schema,
    pub data: Option<&'a DataMap>,
    pub initial_data: Option<&'a DataMap>,
    /// Simplified schema whose keys count as focused fields.
    pub focus: Option<&'a SimplifiedSchema>,
    pub read_only: bool,
}

impl<'a> FormSource<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            data: None,
            initial_data: None,
            focus: None,
            read_only: false,
        }
    }
}

/// Builds the control layout for `source`.
///
/// A field is primary when `show_all_fields_by_default` is set, or it is
/// required, or it is focused. Remaining fields go to the optional group
/// when `show_optional` is set and are omitted otherwise.
pub fn build_form_layout(
    source: &FormSource<'_>,
    options: &FormRenderOptions,
    data_provider: &dyn DataProvider,
) -> FormLayout {
    let mut layout = FormLayout::default();

    for (name, entry) in source.schema.iter() {
        let Some(descriptor) = entry.primary() else {
            continue;
        };
        if descriptor.hints.is_hidden() {
            continue;
        }

        let focused = source.focus.is_some_and(|focus| focus.contains_key(name));
        let primary = options.show_all_fields_by_default || descriptor.required || focused;
        if !primary && !options.show_optional {
            continue;
        }

        let control = select_control(descriptor, options);
        let choices = match (control, descriptor.ref_type.as_deref()) {
            (ControlKind::MultiSelect, Some(ref_type)) => data_provider.choices(ref_type),
            _ => Vec::new(),
        };
        let value = source
            .data
            .and_then(|data| data.get(name))
            .or_else(|| source.initial_data.and_then(|initial| initial.get(name)))
            .cloned()
            .unwrap_or(Value::Null);

        let field = FieldControl {
            name: name.to_string(),
            label: descriptor
                .label
                .clone()
                .unwrap_or_else(|| field_label(name)),
            control,
            field_type: descriptor.kind,
            required: descriptor.required,
            read_only: source.read_only,
            repeated: entry.is_sequence(),
            options: descriptor.options.clone(),
            choices,
            min: descriptor.min,
            max: descriptor.max,
            value,
        };

        if primary {
            layout.fields.push(field);
        } else {
            layout.optional.push(field);
        }
    }

    layout
}

fn field_label(name: &str) -> String {
    crate::dialog::labels::humanize_data_type(name)
}
