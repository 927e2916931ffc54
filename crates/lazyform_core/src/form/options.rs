//! Form rendering options.

use serde::{Deserialize, Serialize};

/// Control-selection and visibility policy for the form generator.
///
/// Every `use_*` flag defaults to `false`; both visibility flags default to
/// `true`, so an unconfigured form renders every field with plain inputs.
/// A field's own presentation hint wins over the matching flag here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormRenderOptions {
    /// `array-of-object-id` fields render as a multi-select of known entities.
    pub use_multi_select_for_object_ids: bool,
    /// `number` fields render as sliders.
    pub use_sliders_for_numbers: bool,
    /// `boolean` fields render as switches instead of checkboxes.
    pub use_switches_for_boolean: bool,
    /// `array-of-string` fields render as badge lists.
    pub use_badges_for_string_arrays: bool,
    /// `date-range` fields render as one range picker instead of a date list.
    pub use_date_range_for_date_arrays: bool,
    /// `decimal` fields render as radial controls.
    pub use_radial_for_decimals: bool,
    /// Render every non-hidden field in the primary group.
    pub show_all_fields_by_default: bool,
    /// Render fields outside the primary group in a separate optional group.
    pub show_optional: bool,
}

impl Default for FormRenderOptions {
    fn default() -> Self {
        Self {
            use_multi_select_for_object_ids: false,
            use_sliders_for_numbers: false,
            use_switches_for_boolean: false,
            use_badges_for_string_arrays: false,
            use_date_range_for_date_arrays: false,
            use_radial_for_decimals: false,
            show_all_fields_by_default: true,
            show_optional: true,
        }
    }
}

impl FormRenderOptions {
    /// Options that surface only required and focused fields up front.
    pub fn focused() -> Self {
        Self {
            show_all_fields_by_default: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FormRenderOptions;
    use serde_json::json;

    #[test]
    fn missing_flags_take_documented_defaults() {
        let options: FormRenderOptions =
            serde_json::from_value(json!({ "useSlidersForNumbers": true })).unwrap();
        assert!(options.use_sliders_for_numbers);
        assert!(!options.use_switches_for_boolean);
        assert!(options.show_all_fields_by_default);
        assert!(options.show_optional);
    }

    #[test]
    fn focused_only_hides_non_primary_fields_by_default() {
        let options = FormRenderOptions::focused();
        assert!(!options.show_all_fields_by_default);
        assert!(options.show_optional);
    }
}
