//! Release selection for a project
//!
//! A [`Project`] is a snapshot of the project-wide JSON document. Version
//! metadata is fetched lazily, at most once per version, and the default
//! version the index already sent is reused without another request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::index::registry::PackageIndex;
use crate::index::types::{ProjectPayload, ProjectVersion, ReleaseFile, first_upload};
use crate::version::error::QypiError;
use crate::version::ordering::{ComparableVersion, compare_original, sort_versions};
use crate::version::spec::VersionSpec;

/// Flags controlling which release counts as "the" release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// `Some(true)` allows prereleases, `Some(false)` excludes them, and
    /// `None` excludes them unless nothing else matches.
    pub prereleases: Option<bool>,
    /// Prefer the most recently uploaded release over the highest version
    pub newest: bool,
    /// Consider yanked releases
    pub yanked: bool,
}

pub struct Project<'a> {
    index: &'a dyn PackageIndex,
    default_version: ProjectVersion,
    releases: IndexMap<String, Vec<ReleaseFile>>,
    version_cache: HashMap<String, ProjectVersion>,
}

impl<'a> Project<'a> {
    pub fn new(index: &'a dyn PackageIndex, payload: ProjectPayload) -> Self {
        Self {
            index,
            default_version: payload.default_version,
            releases: payload.releases,
            version_cache: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.default_version.name()
    }

    pub fn default_version(&self) -> &ProjectVersion {
        &self.default_version
    }

    /// Version strings in the order the index listed them
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.releases.keys().map(String::as_str)
    }

    /// Files of `version` as listed in the project-wide document
    pub fn release_files(&self, version: &str) -> Option<&[ReleaseFile]> {
        self.releases.get(version).map(Vec::as_slice)
    }

    /// Metadata for `version`, fetched on first use
    pub async fn get_version(&mut self, version: &str) -> Result<&ProjectVersion, QypiError> {
        if !self.version_cache.contains_key(version) {
            let fetched = if version == self.default_version.version() {
                self.default_version.clone()
            } else {
                debug!("Fetching metadata for {} {}", self.name(), version);
                self.index
                    .fetch_project_version(self.name(), version)
                    .await?
            };
            self.version_cache.insert(version.to_string(), fetched);
        }

        Ok(&self.version_cache[version])
    }

    async fn is_yanked(&mut self, version: &str) -> Result<bool, QypiError> {
        Ok(self.get_version(version).await?.is_yanked())
    }

    /// Versions satisfying `spec` under the prerelease policy, in index order
    fn candidates(&self, spec: &VersionSpec, prereleases: Option<bool>) -> Result<Vec<String>, QypiError> {
        let matching: Vec<(&String, ComparableVersion)> = self
            .releases
            .keys()
            .map(|v| (v, ComparableVersion::parse(v)))
            .filter(|(_, parsed)| parsed.satisfies(spec.specifiers()))
            .collect();

        let allow_prereleases = prereleases.unwrap_or_else(|| {
            spec.mentions_prerelease() || matching.iter().all(|(_, parsed)| parsed.is_prerelease())
        });

        let candidates: Vec<String> = matching
            .into_iter()
            .filter(|(_, parsed)| allow_prereleases || !parsed.is_prerelease())
            .map(|(v, _)| v.clone())
            .collect();

        if candidates.is_empty() {
            if let Some(pinned) = spec.pinned_version() {
                if !self.has_version(pinned) {
                    return Err(QypiError::VersionNotFound {
                        name: self.name().to_string(),
                        version: pinned.to_string(),
                    });
                }
            }
        }

        debug!(
            "{} candidate versions of {} for '{}'",
            candidates.len(),
            self.name(),
            spec.specifiers()
        );
        Ok(candidates)
    }

    /// Whether any listed version string parses equal to `version`
    fn has_version(&self, version: &str) -> bool {
        let wanted = ComparableVersion::parse(version);
        self.releases
            .keys()
            .any(|v| ComparableVersion::parse(v) == wanted)
    }

    fn no_match(&self) -> QypiError {
        QypiError::NoMatchingVersion {
            name: self.name().to_string(),
        }
    }

    /// Resolve `spec` to a single release.
    ///
    /// Yanked releases are skipped unless `options.yanked`, exact pins included.
    pub async fn get_version_by_spec(
        &mut self,
        spec: &VersionSpec,
        options: ResolveOptions,
    ) -> Result<ProjectVersion, QypiError> {
        let mut candidates = self.candidates(spec, options.prereleases)?;
        let skip_yanked = !options.yanked;

        if let Some(pinned) = spec.pinned_version() {
            // Prefer the spelling the user asked for among equal versions
            candidates.sort_by(|a, b| {
                (a == pinned)
                    .cmp(&(b == pinned))
                    .then_with(|| compare_original(a, b))
            });
        } else {
            candidates.sort_by(|a, b| compare_original(a, b));
        }

        if options.newest {
            let mut uploaded: Vec<(&String, DateTime<Utc>)> = candidates
                .iter()
                .filter_map(|v| {
                    let files = self.release_files(v)?;
                    first_upload(files).map(|t| (v, t))
                })
                .collect();
            uploaded.sort_by(|(va, ta), (vb, tb)| ta.cmp(tb).then_with(|| compare_original(va, vb)));

            let uploaded: Vec<String> = uploaded.into_iter().rev().map(|(v, _)| v.clone()).collect();
            for version in &uploaded {
                if !skip_yanked || !self.is_yanked(version).await? {
                    return Ok(self.get_version(version).await?.clone());
                }
            }
            debug!(
                "No uploaded candidates for {}, falling back to highest version",
                self.name()
            );
        }

        for version in candidates.iter().rev() {
            if !skip_yanked || !self.is_yanked(version).await? {
                return Ok(self.get_version(version).await?.clone());
            }
        }

        Err(self.no_match())
    }

    /// Resolve `spec` to every matching release, lowest version first
    pub async fn get_all_versions_by_spec(
        &mut self,
        spec: &VersionSpec,
        options: ResolveOptions,
    ) -> Result<Vec<ProjectVersion>, QypiError> {
        let mut candidates = self.candidates(spec, options.prereleases)?;
        candidates.sort_by(|a, b| compare_original(a, b));
        let skip_yanked = !options.yanked;

        let mut versions = Vec::with_capacity(candidates.len());
        for version in &candidates {
            let fetched = self.get_version(version).await?;
            if !skip_yanked || !fetched.is_yanked() {
                versions.push(fetched.clone());
            }
        }
        Ok(versions)
    }

    /// Every listed version string, lowest first
    pub fn sorted_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.releases.keys().cloned().collect();
        sort_versions(&mut versions);
        versions
    }
}
