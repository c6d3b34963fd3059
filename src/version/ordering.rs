//! PEP 440 ordering for version strings published on an index
//!
//! Indexes are not fully consistent, so unparsable strings are kept as
//! [`ComparableVersion::Legacy`] and sorted lexically below every valid
//! version instead of being rejected. Callers always work with the original
//! strings; parsed forms are only used for comparison.

use std::cmp::Ordering;
use std::str::FromStr;

use pep508_rs::pep440_rs::{Version, VersionSpecifiers};

use crate::version::error::QypiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparableVersion {
    Pep440(Version),
    Legacy(String),
}

impl ComparableVersion {
    /// Parse a version string, falling back to lexical ordering when it is
    /// not valid PEP 440.
    pub fn parse(version: &str) -> Self {
        match Version::from_str(version) {
            Ok(parsed) => ComparableVersion::Pep440(parsed),
            Err(_) => ComparableVersion::Legacy(version.to_string()),
        }
    }

    /// Parse a version string, rejecting anything that is not valid PEP 440.
    pub fn parse_strict(version: &str) -> Result<Self, QypiError> {
        Version::from_str(version)
            .map(ComparableVersion::Pep440)
            .map_err(|e| QypiError::MalformedVersion {
                version: version.to_string(),
                message: e.to_string(),
            })
    }

    /// Pre-releases and development releases count as prereleases.
    pub fn is_prerelease(&self) -> bool {
        match self {
            ComparableVersion::Pep440(v) => v.is_pre() || v.is_dev(),
            ComparableVersion::Legacy(_) => false,
        }
    }

    /// Legacy versions only satisfy an empty constraint.
    pub fn satisfies(&self, specifiers: &VersionSpecifiers) -> bool {
        match self {
            ComparableVersion::Pep440(v) => specifiers.contains(v),
            ComparableVersion::Legacy(_) => specifiers.is_empty(),
        }
    }
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ComparableVersion::Pep440(a), ComparableVersion::Pep440(b)) => a.cmp(b),
            (ComparableVersion::Legacy(a), ComparableVersion::Legacy(b)) => a.cmp(b),
            (ComparableVersion::Legacy(_), ComparableVersion::Pep440(_)) => Ordering::Less,
            (ComparableVersion::Pep440(_), ComparableVersion::Legacy(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two original version strings.
///
/// Strings that parse to the same version ("2001.01.01" and "2001.1.1") are
/// ordered lexically so the result is still a total order.
pub fn compare_original(a: &str, b: &str) -> Ordering {
    ComparableVersion::parse(a)
        .cmp(&ComparableVersion::parse(b))
        .then_with(|| a.cmp(b))
}

/// Find the highest version, returning the string exactly as given
pub fn find_highest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .map(|v| (v, ComparableVersion::parse(v)))
        .max_by(|(a, pa), (b, pb)| pa.cmp(pb).then_with(|| a.cmp(b)))
        .map(|(original, _)| original)
}

/// Sort version strings from lowest to highest in place
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by_cached_key(|v| (ComparableVersion::parse(v.as_ref()), v.as_ref().to_string()));
}
