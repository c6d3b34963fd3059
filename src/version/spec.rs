//! Requirement tokens given on the command line
//!
//! A token is either a bare project name (`foobar`), an exact pin
//! (`foobar==1.0`), or any other PEP 508 requirement (`foobar>=1,<2`).

use std::str::FromStr;

use pep508_rs::pep440_rs::{Operator, VersionSpecifiers};
use pep508_rs::{Requirement, VerbatimUrl, VersionOrUrl};
use tracing::warn;

use crate::version::error::QypiError;
use crate::version::ordering::ComparableVersion;

#[derive(Debug, Clone)]
pub struct VersionSpec {
    name: String,
    specifiers: VersionSpecifiers,
    pinned: Option<String>,
}

impl VersionSpec {
    /// A spec matching every version of `name`
    pub fn any(name: &str) -> Self {
        Self {
            name: name.to_string(),
            specifiers: VersionSpecifiers::empty(),
            pinned: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, QypiError> {
        let invalid = |message: String| QypiError::InvalidRequirement {
            input: input.to_string(),
            message,
        };

        let requirement = Requirement::<VerbatimUrl>::from_str(input).map_err(|e| invalid(e.to_string()))?;

        if !requirement.extras.is_empty() {
            warn!("Ignoring extras in requirement '{}'", input);
        }

        let specifiers = match requirement.version_or_url {
            None => VersionSpecifiers::empty(),
            Some(VersionOrUrl::VersionSpecifier(specifiers)) => specifiers,
            Some(VersionOrUrl::Url(_)) => {
                return Err(invalid("URL requirements cannot be looked up on an index".to_string()));
            }
        };

        let pinned = pinned_text(input, &specifiers);
        let name = typed_name(input).unwrap_or_else(|| requirement.name.to_string());

        Ok(Self {
            name,
            specifiers,
            pinned,
        })
    }

    pub fn specifiers(&self) -> &VersionSpecifiers {
        &self.specifiers
    }

    /// The project name as typed, not normalized
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version text of an exact `==`/`===` pin, as the user typed it
    pub fn pinned_version(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// Whether the constraint itself opts in to prereleases.
    ///
    /// A prerelease named by an inclusive clause (`==`, `===`, `>=`, `<=`,
    /// `~=`) makes prereleases acceptable without `--pre`.
    pub fn mentions_prerelease(&self) -> bool {
        self.specifiers.iter().any(|specifier| {
            matches!(
                specifier.operator(),
                Operator::Equal
                    | Operator::ExactEqual
                    | Operator::GreaterThanEqual
                    | Operator::LessThanEqual
                    | Operator::TildeEqual
            ) && ComparableVersion::Pep440(specifier.version().clone()).is_prerelease()
        })
    }
}

impl FromStr for VersionSpec {
    type Err = QypiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn typed_name(input: &str) -> Option<String> {
    let input = input.trim_start();
    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(input.len());
    (end > 0).then(|| input[..end].to_string())
}

fn pinned_text(input: &str, specifiers: &VersionSpecifiers) -> Option<String> {
    let [specifier] = &specifiers[..] else {
        return None;
    };
    if !matches!(specifier.operator(), Operator::Equal | Operator::ExactEqual) {
        return None;
    }

    let (_, rest) = input.split_once("==")?;
    let text = rest
        .trim_start_matches('=')
        .split(';')
        .next()?
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}
