//! Simplified-schema merge.
//!
//! # Responsibility
//! - Overlay a simplified schema's settings onto a full schema.
//! - Report simplified keys that have no base field.
//!
//! # Invariants
//! - Inputs are never mutated; the result is a fresh `Schema`.
//! - Keys absent from the simplified schema pass through unchanged.
//! - Sequence entries receive the override on their first element only;
//!   the remaining elements are preserved as-is.
//! - Merging the same simplified schema twice equals merging it once.

use crate::diagnostics::SchemaError;
use crate::model::schema::{Schema, SchemaEntry, SimplifiedSchema};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Policy for simplified keys with no base field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Drop unmatched keys.
    #[default]
    Lenient,
    /// Fail with `SchemaError::KeyNotFound` on the first unmatched key.
    Strict,
}

/// Merge result with the keys dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub schema: Schema,
    pub dropped_keys: Vec<String>,
}

/// Merges `simplified` onto `full` with lenient policy.
///
/// Returns a clone of `full` when `simplified` is `None`.
pub fn merge_simplified_schema(full: &Schema, simplified: Option<&SimplifiedSchema>) -> Schema {
    match merge_with_mode(full, simplified, MergeMode::Lenient) {
        Ok(report) => report.schema,
        // Lenient merge has no failure path.
        Err(_) => full.clone(),
    }
}

/// Merges `simplified` onto `full` under the given policy.
///
/// # Errors
/// - `SchemaError::KeyNotFound` in `MergeMode::Strict` when a simplified key
///   has no base field.
pub fn merge_with_mode(
    full: &Schema,
    simplified: Option<&SimplifiedSchema>,
    mode: MergeMode,
) -> Result<MergeReport, SchemaError> {
    let Some(simplified) = simplified else {
        return Ok(MergeReport {
            schema: full.clone(),
            dropped_keys: Vec::new(),
        });
    };

    let mut effective = full.clone();
    let mut dropped_keys = Vec::new();

    for (key, settings) in simplified.iter() {
        let Some(base) = full.get(key) else {
            if mode == MergeMode::Strict {
                warn!(
                    "event=schema_merge module=schema status=error field={key} error_code=key_not_found"
                );
                return Err(SchemaError::KeyNotFound(key.to_string()));
            }
            debug!("event=schema_merge module=schema status=dropped field={key}");
            dropped_keys.push(key.to_string());
            continue;
        };

        let merged = match base {
            SchemaEntry::Field(descriptor) => SchemaEntry::Field(descriptor.merged(settings)),
            SchemaEntry::Sequence(items) => match items.split_first() {
                Some((first, rest)) => {
                    let mut merged_items = Vec::with_capacity(items.len());
                    merged_items.push(first.merged(settings));
                    merged_items.extend(rest.iter().cloned());
                    SchemaEntry::Sequence(merged_items)
                }
                None => {
                    debug!(
                        "event=schema_merge module=schema status=skipped field={key} reason=empty_sequence"
                    );
                    continue;
                }
            },
        };
        effective.insert(key, merged);
    }

    debug!(
        "event=schema_merge module=schema status=ok fields={} overrides={} dropped={}",
        effective.len(),
        simplified.len(),
        dropped_keys.len()
    );

    Ok(MergeReport {
        schema: effective,
        dropped_keys,
    })
}
