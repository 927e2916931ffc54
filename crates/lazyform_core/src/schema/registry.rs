//! Injected schema and data lookups.
//!
//! # Responsibility
//! - Define the read-only seams dialogs use to find schemas and entities.
//! - Provide in-process registries for first-party wiring and tests.
//!
//! # Invariants
//! - Dialogs only read through these traits; registration happens up front.
//! - Data type ids are trimmed and validated at registration time.

use crate::model::schema::{DataMap, Schema, SimplifiedSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema lookup by data type.
pub trait SchemaProvider {
    /// Returns the full schema registered for `data_type`.
    fn schema(&self, data_type: &str) -> Option<Schema>;

    /// Returns the human-readable entity name, when registered.
    fn display_name(&self, _data_type: &str) -> Option<String> {
        None
    }

    /// Returns a named simplified-schema preset for `data_type`.
    fn preset(&self, _data_type: &str, _preset_name: &str) -> Option<SimplifiedSchema> {
        None
    }
}

/// Entity collection lookup by data type.
pub trait DataProvider {
    /// Returns the current records of `data_type`.
    fn records(&self, data_type: &str) -> Vec<DataMap>;

    /// Returns selectable references for object-id fields.
    ///
    /// Records without an `id` are skipped. The label prefers `title`, then
    /// `name`, then the id itself.
    fn choices(&self, data_type: &str) -> Vec<EntityRef> {
        self.records(data_type)
            .iter()
            .filter_map(EntityRef::from_record)
            .collect()
    }
}

/// One selectable entity reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub label: String,
}

impl EntityRef {
    pub fn from_record(record: &DataMap) -> Option<Self> {
        let id = value_as_label(record.get("id")?)?;
        let label = ["title", "name"]
            .iter()
            .filter_map(|key| record.get(*key).and_then(value_as_label))
            .find(|label| !label.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Some(Self { id, label })
    }
}

fn value_as_label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Registration errors for in-process registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRegistryError {
    InvalidDataType(String),
    DuplicateDataType(String),
    DataTypeNotFound(String),
}

impl Display for SchemaRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDataType(value) => write!(f, "data type is invalid: {value}"),
            Self::DuplicateDataType(value) => {
                write!(f, "data type already registered: {value}")
            }
            Self::DataTypeNotFound(value) => write!(f, "data type not found: {value}"),
        }
    }
}

impl Error for SchemaRegistryError {}

#[derive(Debug, Clone, PartialEq)]
struct RegisteredSchema {
    schema: Schema,
    display_name: Option<String>,
    presets: BTreeMap<String, SimplifiedSchema>,
}

/// In-process schema registry.
#[derive(Debug, Default)]
pub struct InMemorySchemaRegistry {
    entries: BTreeMap<String, RegisteredSchema>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one schema under a new data type.
    pub fn register(
        &mut self,
        data_type: &str,
        schema: Schema,
        display_name: Option<String>,
    ) -> Result<(), SchemaRegistryError> {
        let data_type = normalize_data_type(data_type)?;
        if self.entries.contains_key(data_type.as_str()) {
            return Err(SchemaRegistryError::DuplicateDataType(data_type));
        }
        self.entries.insert(
            data_type,
            RegisteredSchema {
                schema,
                display_name,
                presets: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Adds or replaces a named simplified-schema preset.
    pub fn register_preset(
        &mut self,
        data_type: &str,
        preset_name: &str,
        preset: SimplifiedSchema,
    ) -> Result<(), SchemaRegistryError> {
        let data_type = normalize_data_type(data_type)?;
        let entry = self
            .entries
            .get_mut(data_type.as_str())
            .ok_or(SchemaRegistryError::DataTypeNotFound(data_type.clone()))?;
        entry.presets.insert(preset_name.trim().to_string(), preset);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns sorted data type ids.
    pub fn data_types(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl SchemaProvider for InMemorySchemaRegistry {
    fn schema(&self, data_type: &str) -> Option<Schema> {
        self.entries
            .get(data_type.trim())
            .map(|entry| entry.schema.clone())
    }

    fn display_name(&self, data_type: &str) -> Option<String> {
        self.entries
            .get(data_type.trim())
            .and_then(|entry| entry.display_name.clone())
    }

    fn preset(&self, data_type: &str, preset_name: &str) -> Option<SimplifiedSchema> {
        self.entries
            .get(data_type.trim())
            .and_then(|entry| entry.presets.get(preset_name.trim()).cloned())
    }
}

/// In-process entity collections keyed by data type.
#[derive(Debug, Default)]
pub struct InMemoryDataRegistry {
    records: BTreeMap<String, Vec<DataMap>>,
}

impl InMemoryDataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record collection for `data_type`.
    pub fn set_records(&mut self, data_type: &str, records: Vec<DataMap>) {
        self.records.insert(data_type.trim().to_string(), records);
    }
}

impl DataProvider for InMemoryDataRegistry {
    fn records(&self, data_type: &str) -> Vec<DataMap> {
        self.records
            .get(data_type.trim())
            .cloned()
            .unwrap_or_default()
    }
}

/// Empty data source for dialogs without object-id fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoData;

impl DataProvider for NoData {
    fn records(&self, _data_type: &str) -> Vec<DataMap> {
        Vec::new()
    }
}

/// Trims and validates a data type id.
///
/// Accepted ids start with an ASCII letter and contain only ASCII
/// alphanumerics, `_` or `-` (`task`, `time_log`, `journalEntry`).
pub fn normalize_data_type(value: &str) -> Result<String, SchemaRegistryError> {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    };
    if !valid {
        return Err(SchemaRegistryError::InvalidDataType(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
