//! Shaping of project version metadata

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use crate::index::types::{ProjectVersion, ReleaseFile};
use crate::shape::clean_pypi_dict;

/// File keys that describe index storage rather than the file
const STORAGE_KEYS: [&str; 1] = ["path"];

/// Output switches that are off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Keep the long description
    pub description: bool,
    /// Keep download counters, which the index no longer maintains
    pub trust_downloads: bool,
}

/// Render a timestamp the way every qypi command does
pub fn show_datetime(dt: Option<DateTime<Utc>>) -> Value {
    dt.map_or(Value::Null, |dt| {
        Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    })
}

/// Shape a version's info block into the `info` output schema
pub fn shape_version_info(version: &ProjectVersion, options: ShapeOptions) -> Map<String, Value> {
    let mut info = clean_pypi_dict(&version.info);

    if !options.description {
        info.remove("description");
    }
    if !options.trust_downloads {
        info.remove("downloads");
    }

    let url = info.remove("home_page").unwrap_or(Value::Null);
    info.insert("url".to_string(), url);
    info.insert(
        "release_date".to_string(),
        show_datetime(version.upload_time()),
    );

    let people = ["author", "maintainer"]
        .into_iter()
        .filter_map(|role| {
            let name = info.remove(role).unwrap_or(Value::Null);
            let email = info.remove(&format!("{role}_email")).unwrap_or(Value::Null);
            if name.is_null() && email.is_null() {
                return None;
            }
            Some(json!({"name": name, "email": email, "role": role}))
        })
        .collect();
    info.insert("people".to_string(), Value::Array(people));

    // Renamed between PyPI Legacy and Warehouse
    if !info.contains_key("project_url") {
        if let Some(package_url) = info.remove("package_url") {
            info.insert("project_url".to_string(), package_url);
        }
    }

    info
}

/// Shape one release file for output
pub fn shape_file(file: &ReleaseFile, trust_downloads: bool) -> Map<String, Value> {
    file.fields()
        .iter()
        .filter(|(key, _)| !STORAGE_KEYS.contains(&key.as_str()))
        .filter(|(key, _)| trust_downloads || key.as_str() != "downloads")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
