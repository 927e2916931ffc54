//! Field value seeding and checks.
//!
//! # Responsibility
//! - Build a fresh record from schema defaults.
//! - Report values that do not fit their field descriptor.
//!
//! # Invariants
//! - Checks never modify data; they only describe mismatches.
//! - Only keys declared in the schema are checked.
//! - Reasons describe the mismatch without echoing the value.

use crate::diagnostics::FormDiagnostic;
use crate::model::field::{FieldDescriptor, FieldType};
use crate::model::schema::{DataMap, Schema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid iso date regex"));

/// Builds a record holding each field's seed value, in schema order.
///
/// Empty sequence entries are skipped.
pub fn seed_defaults(schema: &Schema) -> DataMap {
    let mut data = DataMap::new();
    for (name, entry) in schema.iter() {
        let Some(descriptor) = entry.primary() else {
            continue;
        };
        let value = if entry.is_sequence() && !descriptor.seed_value().is_array() {
            Value::Array(Vec::new())
        } else {
            descriptor.seed_value()
        };
        data.insert(name.to_string(), value);
    }
    data
}

/// Checks one value against its descriptor.
///
/// `null` passes for optional fields. Required fields reject `null`, empty
/// strings and empty arrays.
pub fn check_value(descriptor: &FieldDescriptor, value: &Value) -> Result<(), String> {
    if is_blank(value) {
        if descriptor.required {
            return Err("value is required".to_string());
        }
        return Ok(());
    }

    match descriptor.kind {
        FieldType::String => expect_string(value).map(|_| ()),
        FieldType::Date => check_date(value),
        FieldType::Number | FieldType::Decimal => check_number(descriptor, value),
        FieldType::Boolean => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err("expected a boolean".to_string())
            }
        }
        FieldType::DateRange => check_date_range(value),
        FieldType::ArrayOfString => {
            for item in expect_array(value)? {
                expect_string(item)?;
            }
            Ok(())
        }
        FieldType::ArrayOfObjectId => {
            for item in expect_array(value)? {
                if !(item.is_string() || item.is_u64() || item.is_i64()) {
                    return Err("expected object ids".to_string());
                }
            }
            Ok(())
        }
        FieldType::Enum => match value {
            Value::Array(items) if descriptor.hints.multi_select.unwrap_or(false) => {
                for item in items {
                    check_option(descriptor, expect_string(item)?)?;
                }
                Ok(())
            }
            other => check_option(descriptor, expect_string(other)?),
        },
    }
}

/// Checks every schema field present in `data`.
pub fn check_data(schema: &Schema, data: &DataMap) -> Vec<FormDiagnostic> {
    schema
        .iter()
        .filter_map(|(name, entry)| {
            let descriptor = entry.primary()?;
            let value = data.get(name).unwrap_or(&Value::Null);
            let spread = entry.is_sequence() && value.is_array() && !is_array_kind(descriptor.kind);
            let result = if spread {
                expect_array(value).and_then(|items| {
                    items
                        .iter()
                        .try_for_each(|item| check_value(descriptor, item))
                })
            } else {
                check_value(descriptor, value)
            };
            result.err().map(|reason| FormDiagnostic::InvalidValue {
                field: name.to_string(),
                reason,
            })
        })
        .collect()
}

fn is_array_kind(kind: FieldType) -> bool {
    matches!(
        kind,
        FieldType::DateRange | FieldType::ArrayOfString | FieldType::ArrayOfObjectId
    )
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn expect_string(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| "expected a string".to_string())
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| "expected a list".to_string())
}

fn check_date(value: &Value) -> Result<(), String> {
    let text = expect_string(value)?;
    if ISO_DATE_RE.is_match(text) {
        Ok(())
    } else {
        Err("expected an ISO date (YYYY-MM-DD)".to_string())
    }
}

fn check_date_range(value: &Value) -> Result<(), String> {
    let items = expect_array(value)?;
    if items.len() > 2 {
        return Err(format!("date range has {} bounds, expected at most 2", items.len()));
    }
    for item in items {
        check_date(item)?;
    }
    if let [start, end] = items.as_slice() {
        let (start, end) = (expect_string(start)?, expect_string(end)?);
        if end < start {
            return Err("range end must not be earlier than range start".to_string());
        }
    }
    Ok(())
}

fn check_number(descriptor: &FieldDescriptor, value: &Value) -> Result<(), String> {
    let number = value
        .as_f64()
        .ok_or_else(|| "expected a number".to_string())?;
    if descriptor.kind == FieldType::Number && number.fract() != 0.0 {
        return Err("expected a whole number".to_string());
    }
    if let Some(min) = descriptor.min {
        if number < min {
            return Err(format!("must be >= {min}"));
        }
    }
    if let Some(max) = descriptor.max {
        if number > max {
            return Err(format!("must be <= {max}"));
        }
    }
    Ok(())
}

fn check_option(descriptor: &FieldDescriptor, value: &str) -> Result<(), String> {
    if descriptor.options.is_empty() || descriptor.options.iter().any(|option| option == value) {
        Ok(())
    } else {
        Err("value is not one of the allowed options".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{check_data, check_value, seed_defaults};
    use crate::diagnostics::FormDiagnostic;
    use crate::model::field::{FieldDescriptor, FieldType, PresentationHints};
    use crate::model::schema::Schema;
    use serde_json::json;

    #[test]
    fn seeds_defaults_in_schema_order() {
        let schema = Schema::new()
            .with_field("title", FieldDescriptor::new(FieldType::String))
            .with_field(
                "status",
                FieldDescriptor::new(FieldType::Enum)
                    .with_options(["todo", "done"])
                    .with_default(json!("todo")),
            )
            .with_field("subtasks", vec![FieldDescriptor::new(FieldType::String)])
            .with_field("empty", Vec::<FieldDescriptor>::new());

        let seeded = seed_defaults(&schema);
        assert_eq!(
            serde_json::Value::Object(seeded),
            json!({ "title": "", "status": "todo", "subtasks": [] })
        );
    }

    #[test]
    fn required_rejects_blank_values() {
        let required = FieldDescriptor::new(FieldType::String).required();
        assert!(check_value(&required, &json!("  ")).is_err());
        assert!(check_value(&required, &json!(null)).is_err());
        assert!(check_value(&FieldDescriptor::new(FieldType::String), &json!(null)).is_ok());
    }

    #[test]
    fn enum_values_must_be_listed_options() {
        let priority = FieldDescriptor::new(FieldType::Enum).with_options(["low", "high"]);
        assert!(check_value(&priority, &json!("high")).is_ok());
        assert!(check_value(&priority, &json!("urgent")).is_err());

        let labels = FieldDescriptor::new(FieldType::Enum)
            .with_options(["a", "b"])
            .with_hints(PresentationHints {
                multi_select: Some(true),
                ..PresentationHints::default()
            });
        assert!(check_value(&labels, &json!(["a", "b"])).is_ok());
        assert!(check_value(&labels, &json!(["a", "c"])).is_err());
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let range = FieldDescriptor::new(FieldType::DateRange);
        assert!(check_value(&range, &json!(["2026-01-01", "2026-01-31"])).is_ok());
        let err = check_value(&range, &json!(["2026-02-01", "2026-01-31"])).unwrap_err();
        assert!(err.contains("earlier"));
        assert!(check_value(&range, &json!(["yesterday"])).is_err());
    }

    #[test]
    fn numbers_respect_bounds_and_integrality() {
        let mut effort = FieldDescriptor::new(FieldType::Number);
        effort.min = Some(1.0);
        effort.max = Some(5.0);
        assert!(check_value(&effort, &json!(3)).is_ok());
        assert!(check_value(&effort, &json!(9)).is_err());
        assert!(check_value(&effort, &json!(2.5)).is_err());
        assert!(check_value(&FieldDescriptor::new(FieldType::Decimal), &json!(2.5)).is_ok());
    }

    #[test]
    fn reasons_do_not_echo_values() {
        let due = FieldDescriptor::new(FieldType::Date);
        let reason = check_value(&due, &json!("call mom at 555-0100")).unwrap_err();
        assert!(!reason.contains("555"));

        let status = FieldDescriptor::new(FieldType::Enum).with_options(["todo", "done"]);
        let reason = check_value(&status, &json!("secret plan")).unwrap_err();
        assert!(!reason.contains("secret"));
    }

    #[test]
    fn check_data_reports_field_names() {
        let schema = Schema::new()
            .with_field("title", FieldDescriptor::new(FieldType::String).required())
            .with_field("done", FieldDescriptor::new(FieldType::Boolean));
        let data = json!({ "title": "ok", "done": "yes", "extra": 1 })
            .as_object()
            .cloned()
            .unwrap();

        let diagnostics = check_data(&schema, &data);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            FormDiagnostic::InvalidValue { field, .. } if field == "done"
        ));
    }
}
