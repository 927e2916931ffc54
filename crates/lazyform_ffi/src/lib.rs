//! Flutter-facing bindings for `lazyform_core`.

pub mod api;
