//! One handler per subcommand
//!
//! Handlers write results to `out` and per-input diagnostics to `err`; the
//! final error, if any, is reported by the caller.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::args::{
    BrowseArgs, FilesArgs, InfoArgs, OwnedArgs, OwnerArgs, ReadmeArgs, ReleasesArgs, SearchArgs,
    SelectArgs,
};
use super::error::CliError;
use crate::client::{Qypi, SearchSpec};
use crate::index::types::ProjectVersion;
use crate::shape::project::show_datetime;
use crate::shape::{dumps, shape_file, shape_version_info, squish_versions};
use crate::version::error::QypiError;
use crate::version::ordering::ComparableVersion;

const NO_DESCRIPTION: &str = "--- no description ---";

const PRE_HINT: &str = "prereleases were excluded by --no-pre; try --pre";

/// Print `value` as JSON followed by a newline
fn emit_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    writeln!(out, "{}", dumps(value)?)?;
    Ok(())
}

fn resolution_error(err: QypiError, select: &SelectArgs) -> CliError {
    let excluded_pre = select.excludes_prereleases() && matches!(err, QypiError::NoMatchingVersion { .. });
    let err = CliError::from_query(err);
    if excluded_pre {
        err.with_hint(PRE_HINT)
    } else {
        err
    }
}

async fn resolve_one(qypi: &Qypi, project: &str, select: &SelectArgs) -> Result<ProjectVersion, CliError> {
    qypi.get_requirement(project, select.resolve_options())
        .await
        .map_err(|e| resolution_error(e, select))
}

async fn resolve_all(qypi: &Qypi, project: &str, select: &SelectArgs) -> Result<Vec<ProjectVersion>, CliError> {
    qypi.get_all_requirements(project, select.resolve_options())
        .await
        .map_err(|e| resolution_error(e, select))
}

pub async fn info(qypi: &Qypi, args: &InfoArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let shape = args.shape_options();

    if args.all.enabled() {
        let versions = resolve_all(qypi, &args.project, &args.select).await?;
        let shaped: Vec<Value> = versions
            .iter()
            .map(|v| Value::Object(shape_version_info(v, shape)))
            .collect();
        emit_json(out, &shaped)
    } else {
        let version = resolve_one(qypi, &args.project, &args.select).await?;
        emit_json(out, &shape_version_info(&version, shape))
    }
}

pub async fn readme(qypi: &Qypi, args: &ReadmeArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let version = resolve_one(qypi, &args.project, &args.select).await?;
    writeln!(out, "{}", version.description().unwrap_or(NO_DESCRIPTION))?;
    Ok(())
}

pub async fn releases(qypi: &Qypi, args: &ReleasesArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let mut project = qypi.get_project(&args.project).await?;

    let mut data = Vec::new();
    for version in project.sorted_versions() {
        let fetched = project.get_version(&version).await?;
        data.push(json!({
            "version": version,
            "is_prerelease": ComparableVersion::parse(&version).is_prerelease(),
            "is_yanked": fetched.is_yanked(),
            "release_date": show_datetime(fetched.upload_time()),
            "release_url": fetched.release_url(),
        }));
    }

    emit_json(out, &data)
}

pub async fn files(qypi: &Qypi, args: &FilesArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let trust = args.trust_downloads.enabled();
    let shape_files = |version: &ProjectVersion| -> Vec<Value> {
        version
            .files
            .iter()
            .map(|f| Value::Object(shape_file(f, trust)))
            .collect()
    };

    if args.all.enabled() {
        let versions = resolve_all(qypi, &args.project, &args.select).await?;
        let by_version: Map<String, Value> = versions
            .iter()
            .map(|v| (v.version().to_string(), Value::Array(shape_files(v))))
            .collect();
        emit_json(out, &by_version)
    } else {
        let version = resolve_one(qypi, &args.project, &args.select).await?;
        emit_json(out, &shape_files(&version))
    }
}

pub async fn list(qypi: &Qypi, out: &mut dyn Write) -> Result<(), CliError> {
    for name in qypi.list_all_projects().await? {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

pub async fn search(qypi: &Qypi, args: &SearchArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let spec = SearchSpec::from_terms(&args.terms);
    let mut results = qypi.search(&spec, args.operator()).await?;
    if args.projects.squish() {
        results = squish_versions(&results);
    }
    emit_json(out, &results)
}

pub async fn browse(qypi: &Qypi, args: &BrowseArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let mut classifiers = args.classifiers.clone();
    if let Some(path) = &args.file {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        })?;
        classifiers.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    debug!("Browsing {} classifiers", classifiers.len());

    let mut results = qypi.browse(&classifiers).await?;
    if args.projects.squish() {
        results = squish_versions(&results);
    }
    emit_json(out, &results)
}

/// Run `lookup` for every input, keying successes by input.
///
/// Failures are reported to `err` as they happen and the remaining inputs
/// are still processed.
async fn batch<'a, T, F, Fut>(
    inputs: &'a [String],
    lookup: F,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError>
where
    T: Serialize,
    F: Fn(&'a str) -> Fut,
    Fut: std::future::Future<Output = Result<T, QypiError>>,
{
    let mut found = Map::new();
    let mut failed = 0;
    for input in inputs {
        match lookup(input).await {
            Ok(value) => {
                found.insert(input.clone(), serde_json::to_value(value)?);
            }
            Err(e) => {
                writeln!(err, "Error: {}", e)?;
                failed += 1;
            }
        }
    }

    emit_json(out, &found)?;
    if failed > 0 {
        return Err(CliError::Partial {
            failed,
            total: inputs.len(),
        });
    }
    Ok(())
}

pub async fn owner(
    qypi: &Qypi,
    args: &OwnerArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    batch(&args.projects, |project| qypi.get_project_roles(project), out, err).await
}

pub async fn owned(
    qypi: &Qypi,
    args: &OwnedArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    batch(&args.users, |user| qypi.get_user_roles(user), out, err).await
}
