//! Field descriptor model.
//!
//! # Responsibility
//! - Define the canonical description of one form field.
//! - Define the partial settings record used by simplified schemas.
//!
//! # Invariants
//! - Override merge is field-wise: a `Some` override always wins.
//! - Merging never mutates the base descriptor; it returns a new value.
//! - Properties outside the typed set (`placeholder`, `description`, ...)
//!   are carried in `extra` and merged key-wise.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Enumerated kind of a form field.
///
/// Serialized in kebab-case (`date-range`, `array-of-object-id`) to match
/// schema documents stored by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    DateRange,
    ArrayOfString,
    ArrayOfObjectId,
    Enum,
    Decimal,
}

impl FieldType {
    /// Stable string id used in schema documents and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateRange => "date-range",
            Self::ArrayOfString => "array-of-string",
            Self::ArrayOfObjectId => "array-of-object-id",
            Self::Enum => "enum",
            Self::Decimal => "decimal",
        }
    }

    /// Value a freshly created record carries when no default is declared.
    pub fn empty_value(self) -> Value {
        match self {
            Self::String | Self::Date | Self::Enum => Value::String(String::new()),
            Self::Number | Self::Decimal => Value::from(0),
            Self::Boolean => Value::Bool(false),
            Self::DateRange | Self::ArrayOfString | Self::ArrayOfObjectId => {
                Value::Array(Vec::new())
            }
        }
    }
}

/// Rendering policy flags consumed by the form generator.
///
/// `None` defers to the global `FormRenderOptions`; `Some(_)` pins the
/// control choice for this one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<bool>,
    /// Suppresses the field entirely, regardless of visibility options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl PresentationHints {
    fn merged(&self, over: &PresentationHints) -> PresentationHints {
        PresentationHints {
            slider: over.slider.or(self.slider),
            switch: over.switch.or(self.switch),
            badges: over.badges.or(self.badges),
            radial: over.radial.or(self.radial),
            multi_select: over.multi_select.or(self.multi_select),
            hidden: over.hidden.or(self.hidden),
        }
    }

    /// Returns whether the field is explicitly hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

/// Describes one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Serialized as `type` to match schema document naming.
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Ordered selectable values for enum-like fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Entity data type referenced by `array-of-object-id` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(flatten)]
    pub hints: PresentationHints,
    /// Host-defined properties passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDescriptor {
    /// Creates an optional field of the given kind with no hints.
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind,
            label: None,
            options: Vec::new(),
            required: false,
            default_value: None,
            ref_type: None,
            min: None,
            max: None,
            hints: PresentationHints::default(),
            extra: Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_ref_type(mut self, ref_type: impl Into<String>) -> Self {
        self.ref_type = Some(ref_type.into());
        self
    }

    pub fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }

    /// Returns a new descriptor with `settings` laid over this one.
    pub fn merged(&self, settings: &FieldSettings) -> FieldDescriptor {
        FieldDescriptor {
            kind: settings.kind.unwrap_or(self.kind),
            label: settings.label.clone().or_else(|| self.label.clone()),
            options: settings
                .options
                .clone()
                .unwrap_or_else(|| self.options.clone()),
            required: settings.required.unwrap_or(self.required),
            default_value: settings
                .default_value
                .clone()
                .or_else(|| self.default_value.clone()),
            ref_type: settings.ref_type.clone().or_else(|| self.ref_type.clone()),
            min: settings.min.or(self.min),
            max: settings.max.or(self.max),
            hints: self.hints.merged(&settings.hints),
            extra: merged_extra(&self.extra, &settings.extra),
        }
    }

    /// Value used to seed a new record for this field.
    pub fn seed_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }
}

fn merged_extra(base: &Map<String, Value>, over: &Map<String, Value>) -> Map<String, Value> {
    let mut extra = base.clone();
    for (key, value) in over {
        extra.insert(key.clone(), value.clone());
    }
    extra
}

/// Partial field descriptor used as a simplified-schema override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSettings {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(flatten)]
    pub hints: PresentationHints,
    /// Host-defined properties passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, FieldSettings, FieldType, PresentationHints};
    use serde_json::json;

    #[test]
    fn field_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(FieldType::ArrayOfObjectId).unwrap(),
            json!("array-of-object-id")
        );
        let kind: FieldType = serde_json::from_value(json!("date-range")).unwrap();
        assert_eq!(kind, FieldType::DateRange);
        assert_eq!(kind.as_str(), "date-range");
    }

    #[test]
    fn descriptor_reads_camel_case_document() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "type": "number",
            "required": true,
            "defaultValue": 3,
            "slider": true,
            "min": 0,
            "max": 10
        }))
        .unwrap();

        assert_eq!(descriptor.kind, FieldType::Number);
        assert!(descriptor.required);
        assert_eq!(descriptor.default_value, Some(json!(3)));
        assert_eq!(descriptor.hints.slider, Some(true));
        assert_eq!(descriptor.max, Some(10.0));
    }

    #[test]
    fn merged_prefers_override_and_keeps_base_elsewhere() {
        let base = FieldDescriptor::new(FieldType::Enum)
            .with_options(["low", "high"])
            .with_label("Priority");
        let settings = FieldSettings::new()
            .with_options(["high"])
            .required(true)
            .with_hints(PresentationHints {
                multi_select: Some(true),
                ..PresentationHints::default()
            });

        let merged = base.merged(&settings);
        assert_eq!(merged.options, vec!["high".to_string()]);
        assert!(merged.required);
        assert_eq!(merged.label.as_deref(), Some("Priority"));
        assert_eq!(merged.hints.multi_select, Some(true));
        assert_eq!(base.options.len(), 2);
    }

    #[test]
    fn unknown_properties_survive_merge_and_serialization() {
        let base: FieldDescriptor = serde_json::from_value(json!({
            "type": "string",
            "placeholder": "What needs doing?",
            "description": "Short title",
            "switch": false
        }))
        .unwrap();
        let settings: FieldSettings =
            serde_json::from_value(json!({ "description": "One line", "autofocus": true }))
                .unwrap();

        assert_eq!(base.hints.switch, Some(false));
        assert!(!base.extra.contains_key("switch"));

        let merged = base.merged(&settings);
        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({
                "type": "string",
                "required": false,
                "switch": false,
                "placeholder": "What needs doing?",
                "description": "One line",
                "autofocus": true
            })
        );
    }

    #[test]
    fn seed_value_falls_back_to_empty_value() {
        assert_eq!(
            FieldDescriptor::new(FieldType::Boolean).seed_value(),
            json!(false)
        );
        assert_eq!(
            FieldDescriptor::new(FieldType::ArrayOfString).seed_value(),
            json!([])
        );
        assert_eq!(
            FieldDescriptor::new(FieldType::String)
                .with_default(json!("todo"))
                .seed_value(),
            json!("todo")
        );
    }
}
