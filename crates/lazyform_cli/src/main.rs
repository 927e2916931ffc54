//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lazyform_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use lazyform_core::{
    merge_simplified_schema, resolve_dialog_labels, DialogType, Schema, SimplifiedSchema,
};
use serde_json::json;

fn main() {
    println!("lazyform_core ping={}", lazyform_core::ping());
    println!("lazyform_core version={}", lazyform_core::core_version());

    for dialog_type in DialogType::ALL {
        let labels = resolve_dialog_labels(dialog_type, "task");
        println!(
            "labels type={} title=\"{}\" submit=\"{}\"",
            dialog_type.as_str(),
            labels.title,
            labels.submit_label
        );
    }

    match sample_merge() {
        Ok(merged) => println!("merge fields={merged}"),
        Err(err) => {
            eprintln!("sample merge failed: {err}");
            std::process::exit(1);
        }
    }
}

fn sample_merge() -> Result<String, serde_json::Error> {
    let full: Schema = serde_json::from_value(json!({
        "title": {"type": "string"},
        "priority": {"type": "enum", "options": ["low", "high"]},
    }))?;
    let simplified: SimplifiedSchema =
        serde_json::from_value(json!({"priority": {"options": ["high"]}}))?;
    let merged = merge_simplified_schema(&full, Some(&simplified));
    Ok(merged.keys().collect::<Vec<_>>().join(","))
}
