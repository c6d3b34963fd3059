//! Presentation layer turning index metadata into qypi's output schema
//!
//! Everything here is pure: inputs are borrowed and new maps are returned.
//!
//! # Modules
//!
//! - [`project`]: info block and file list shaping
//! - [`squish`]: one-result-per-project filtering for search and browse
//! - [`json`]: JSON text output with sorted keys

pub mod json;
pub mod project;
pub mod squish;

pub use json::dumps;
pub use project::{ShapeOptions, shape_file, shape_version_info};
pub use squish::squish_versions;

use serde_json::{Map, Value};

/// Key prefixes of historic ranking and scoring metadata
const RESERVED_PREFIXES: [&str; 2] = ["cheesecake", "_pypi"];

/// Placeholder strings the index uses for "no value"
const SENTINELS: [&str; 2] = ["", "UNKNOWN"];

/// Whether `value` is one of the index's "no value" placeholders
pub fn is_sentinel(value: &Value) -> bool {
    value.as_str().is_some_and(|s| SENTINELS.contains(&s))
}

/// Replace a placeholder with null, leaving everything else as is
pub fn nullify(value: &Value) -> Value {
    if is_sentinel(value) {
        Value::Null
    } else {
        value.clone()
    }
}

/// Drop reserved keys and null out placeholder values
pub fn clean_pypi_dict(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !RESERVED_PREFIXES.iter().any(|p| key.starts_with(p)))
        .map(|(key, value)| (key.clone(), nullify(value)))
        .collect()
}
