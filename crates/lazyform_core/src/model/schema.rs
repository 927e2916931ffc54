//! Schema and simplified-schema containers.
//!
//! # Responsibility
//! - Keep field descriptors keyed by field name in insertion order.
//! - Represent both descriptor-shaped and sequence-shaped schema entries.
//!
//! # Invariants
//! - Keys are unique; insertion order is the default render order.
//! - A sequence entry describes a repeated field by its first element.

use crate::model::field::{FieldDescriptor, FieldSettings};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Working copy of one entity as edited by a dialog.
pub type DataMap = Map<String, Value>;

/// One schema entry: a single descriptor or a sequence of descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaEntry {
    Field(FieldDescriptor),
    Sequence(Vec<FieldDescriptor>),
}

impl SchemaEntry {
    /// Descriptor that drives rendering for this entry.
    ///
    /// Returns `None` only for an empty sequence.
    pub fn primary(&self) -> Option<&FieldDescriptor> {
        match self {
            Self::Field(descriptor) => Some(descriptor),
            Self::Sequence(items) => items.first(),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}

impl From<FieldDescriptor> for SchemaEntry {
    fn from(value: FieldDescriptor) -> Self {
        Self::Field(value)
    }
}

impl From<Vec<FieldDescriptor>> for SchemaEntry {
    fn from(value: Vec<FieldDescriptor>) -> Self {
        Self::Sequence(value)
    }
}

/// Mapping from field name to schema entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    entries: IndexMap<String, SchemaEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used by fixtures and first-party schemas.
    pub fn with_field(mut self, name: impl Into<String>, entry: impl Into<SchemaEntry>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Inserts or replaces an entry; a replaced key keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<SchemaEntry>) {
        self.entries.insert(name.into(), entry.into());
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    /// Rendering descriptor for `name`, if any.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.get(name).and_then(SchemaEntry::primary)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Partial mapping from field name to settings override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimplifiedSchema {
    settings: IndexMap<String, FieldSettings>,
}

impl SimplifiedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, name: impl Into<String>, settings: FieldSettings) -> Self {
        self.settings.insert(name.into(), settings);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSettings> {
        self.settings.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSettings)> {
        self.settings
            .iter()
            .map(|(name, settings)| (name.as_str(), settings))
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Reads a simplified schema from an untyped JSON document.
    ///
    /// A non-object document is treated as "no simplified schema" and yields
    /// `Ok(None)`; an object whose entries are not valid settings is an error.
    pub fn from_value(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        if !value.is_object() {
            return Ok(None);
        }
        serde_json::from_value(value.clone()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::{Schema, SchemaEntry, SimplifiedSchema};
    use crate::model::field::{FieldDescriptor, FieldType};
    use serde_json::json;

    #[test]
    fn schema_keeps_insertion_order_through_json() {
        let schema: Schema = serde_json::from_value(json!({
            "title": { "type": "string", "required": true },
            "tags": [{ "type": "array-of-string" }],
            "priority": { "type": "enum", "options": ["low", "high"] }
        }))
        .unwrap();

        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(keys, vec!["title", "tags", "priority"]);
        assert!(schema.get("tags").unwrap().is_sequence());
        assert_eq!(
            schema.field("tags").map(|field| field.kind),
            Some(FieldType::ArrayOfString)
        );
    }

    #[test]
    fn empty_sequence_has_no_primary_descriptor() {
        let entry = SchemaEntry::Sequence(Vec::new());
        assert!(entry.primary().is_none());
        let entry = SchemaEntry::from(FieldDescriptor::new(FieldType::Date));
        assert_eq!(entry.primary().map(|d| d.kind), Some(FieldType::Date));
    }

    #[test]
    fn simplified_schema_from_non_object_is_absent() {
        assert_eq!(SimplifiedSchema::from_value(&json!(["title"])).unwrap(), None);
        assert_eq!(SimplifiedSchema::from_value(&json!(null)).unwrap(), None);

        let parsed = SimplifiedSchema::from_value(&json!({ "priority": { "required": true } }))
            .unwrap()
            .expect("object document should parse");
        assert_eq!(parsed.get("priority").and_then(|s| s.required), Some(true));
    }
}
