//! Metadata records returned by the package index
//!
//! JSON metadata is kept as open mappings so fields this crate does not know
//! about pass through to the output untouched.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shape::is_sentinel;

/// One distributable file of a release
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReleaseFile(Map<String, Value>);

impl ReleaseFile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn filename(&self) -> Option<&str> {
        self.0.get("filename").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn size(&self) -> Option<u64> {
        self.0.get("size").and_then(Value::as_u64)
    }

    pub fn packagetype(&self) -> Option<&str> {
        self.0.get("packagetype").and_then(Value::as_str)
    }

    pub fn python_version(&self) -> Option<&str> {
        self.0.get("python_version").and_then(Value::as_str)
    }

    pub fn digest(&self, algorithm: &str) -> Option<&str> {
        self.0
            .get("digests")
            .and_then(|d| d.get(algorithm))
            .and_then(Value::as_str)
    }

    pub fn is_yanked(&self) -> bool {
        self.0.get("yanked").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn downloads(&self) -> Option<i64> {
        self.0.get("downloads").and_then(Value::as_i64)
    }

    /// Upload timestamp, preferring the explicit ISO 8601 field.
    ///
    /// The older `upload_time` field carries no offset and is read as UTC.
    pub fn upload_time(&self) -> Option<DateTime<Utc>> {
        let iso = self
            .0
            .get("upload_time_iso_8601")
            .and_then(Value::as_str)
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok());
        if let Some(parsed) = iso {
            return Some(parsed.with_timezone(&Utc));
        }

        let ts = self.0.get("upload_time").and_then(Value::as_str)?;
        DateTime::parse_from_rfc3339(ts)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
                    .map(|naive| naive.and_utc())
            })
    }
}

/// Earliest upload time among `files`
pub fn first_upload(files: &[ReleaseFile]) -> Option<DateTime<Utc>> {
    files.iter().filter_map(ReleaseFile::upload_time).min()
}

/// Metadata for one released version of a project
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ProjectVersion {
    pub info: Map<String, Value>,
    #[serde(rename = "urls", default)]
    pub files: Vec<ReleaseFile>,
    #[serde(default)]
    pub vulnerabilities: Vec<Value>,
}

impl ProjectVersion {
    pub fn name(&self) -> &str {
        self.info_str("name").unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        self.info_str("version").unwrap_or_default()
    }

    pub fn is_yanked(&self) -> bool {
        self.info.get("yanked").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn yanked_reason(&self) -> Option<&str> {
        self.info_str("yanked_reason")
    }

    pub fn release_url(&self) -> Option<&str> {
        self.info_str("release_url")
    }

    /// Long description, unless the index reported a placeholder
    pub fn description(&self) -> Option<&str> {
        self.info_str("description")
    }

    pub fn upload_time(&self) -> Option<DateTime<Utc>> {
        first_upload(&self.files)
    }

    /// String field of the info block, skipping empty and `UNKNOWN` markers
    fn info_str(&self, key: &str) -> Option<&str> {
        self.info
            .get(key)
            .filter(|v| !is_sentinel(v))
            .and_then(Value::as_str)
    }
}

/// Response of the project-wide JSON endpoint
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProjectPayload {
    #[serde(flatten)]
    pub default_version: ProjectVersion,
    #[serde(default)]
    pub releases: IndexMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Role {
    Owner,
    Maintainer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectRole {
    pub role: Role,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRole {
    pub project: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BrowseResult {
    pub name: String,
    pub version: String,
}

/// A (name, version) record that can be squished to one entry per project
pub trait NamedRelease {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
}

impl NamedRelease for SearchResult {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}

impl NamedRelease for BrowseResult {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}
