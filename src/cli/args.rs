//! Argument types for qypi's subcommands
//!
//! On/off switches come in `--flag`/`--no-flag` pairs where the last one
//! given wins.

use std::path::PathBuf;

use clap::Args;

use crate::client::SearchOperator;
use crate::shape::ShapeOptions;
use crate::version::resolver::ResolveOptions;

/// Collapse a `--flag`/`--no-flag` pair into an optional choice
fn tristate(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct PreArgs {
    /// Show prerelease versions [default: only if nothing else matches]
    #[arg(long, overrides_with = "no_pre")]
    pub pre: bool,

    /// Never show prerelease versions
    #[arg(long, overrides_with = "pre")]
    pub no_pre: bool,
}

impl PreArgs {
    pub fn prereleases(&self) -> Option<bool> {
        tristate(self.pre, self.no_pre)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SortArgs {
    /// "Latest" means the most recently uploaded release
    #[arg(long, overrides_with = "highest")]
    pub newest: bool,

    /// "Latest" means the highest version [default]
    #[arg(long, overrides_with = "newest")]
    pub highest: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct YankedArgs {
    /// Consider yanked releases
    #[arg(long, overrides_with = "no_yanked")]
    pub yanked: bool,

    /// Skip yanked releases [default]
    #[arg(long, overrides_with = "yanked")]
    pub no_yanked: bool,
}

/// Flags shared by every command that picks releases
#[derive(Debug, Clone, Default, Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub pre: PreArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    #[command(flatten)]
    pub yanked: YankedArgs,
}

impl SelectArgs {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            prereleases: self.pre.prereleases(),
            newest: tristate(self.sort.newest, self.sort.highest).unwrap_or(false),
            yanked: tristate(self.yanked.yanked, self.yanked.no_yanked).unwrap_or(false),
        }
    }

    /// Whether prereleases were explicitly excluded
    pub fn excludes_prereleases(&self) -> bool {
        self.pre.prereleases() == Some(false)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct AllVersionsArgs {
    /// Show every version matching the requirement
    #[arg(short = 'A', long, overrides_with = "latest_version")]
    pub all_versions: bool,

    /// Show only the latest matching version [default]
    #[arg(long, overrides_with = "all_versions")]
    pub latest_version: bool,
}

impl AllVersionsArgs {
    pub fn enabled(&self) -> bool {
        tristate(self.all_versions, self.latest_version).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct TrustDownloadsArgs {
    /// Show download stats
    #[arg(long, overrides_with = "no_trust_downloads")]
    pub trust_downloads: bool,

    /// Hide download stats [default]
    #[arg(long, overrides_with = "trust_downloads")]
    pub no_trust_downloads: bool,
}

impl TrustDownloadsArgs {
    pub fn enabled(&self) -> bool {
        tristate(self.trust_downloads, self.no_trust_downloads).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProjectsArgs {
    /// Show one result per project
    #[arg(short = 'p', long, overrides_with = "releases")]
    pub projects: bool,

    /// Show one result per release [default]
    #[arg(short = 'r', long, overrides_with = "projects")]
    pub releases: bool,
}

impl ProjectsArgs {
    pub fn squish(&self) -> bool {
        tristate(self.projects, self.releases).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    /// `name` for the latest version or `name==version` for a specific one
    pub project: String,

    /// Include long descriptions
    #[arg(long, overrides_with = "no_description")]
    pub description: bool,

    /// Omit long descriptions [default]
    #[arg(long, overrides_with = "description")]
    pub no_description: bool,

    #[command(flatten)]
    pub trust_downloads: TrustDownloadsArgs,

    #[command(flatten)]
    pub all: AllVersionsArgs,

    #[command(flatten)]
    pub select: SelectArgs,
}

impl InfoArgs {
    pub fn shape_options(&self) -> ShapeOptions {
        ShapeOptions {
            description: tristate(self.description, self.no_description).unwrap_or(false),
            trust_downloads: self.trust_downloads.enabled(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReadmeArgs {
    /// `name` for the latest version or `name==version` for a specific one
    pub project: String,

    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ReleasesArgs {
    pub project: String,
}

#[derive(Debug, Clone, Args)]
pub struct FilesArgs {
    /// `name` for the latest version or `name==version` for a specific one
    pub project: String,

    #[command(flatten)]
    pub trust_downloads: TrustDownloadsArgs,

    #[command(flatten)]
    pub all: AllVersionsArgs,

    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// `field:value` or a bare `value` to search long descriptions
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// AND conditions together [default]
    #[arg(long = "and", overrides_with = "or")]
    pub and: bool,

    /// OR conditions together
    #[arg(long = "or", overrides_with = "and")]
    pub or: bool,

    #[command(flatten)]
    pub projects: ProjectsArgs,
}

impl SearchArgs {
    pub fn operator(&self) -> SearchOperator {
        match tristate(self.or, self.and) {
            Some(true) => SearchOperator::Or,
            _ => SearchOperator::And,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BrowseArgs {
    /// Trove classifiers
    pub classifiers: Vec<String>,

    /// Read further classifiers from a file, one per line
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub projects: ProjectsArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OwnerArgs {
    #[arg(required = true)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct OwnedArgs {
    #[arg(required = true)]
    pub users: Vec<String>,
}
