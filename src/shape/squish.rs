use crate::index::types::NamedRelease;
use crate::version::ordering::find_highest;

/// Keep only the highest version of each run of same-named records.
///
/// Records for the same project are assumed to be adjacent; a name that
/// reappears later starts a new run.
pub fn squish_versions<T: NamedRelease + Clone>(records: &[T]) -> Vec<T> {
    records
        .chunk_by(|a, b| a.name() == b.name())
        .filter_map(|run| {
            let highest = find_highest(run.iter().map(NamedRelease::version))?;
            run.iter().find(|r| r.version() == highest).cloned()
        })
        .collect()
}
