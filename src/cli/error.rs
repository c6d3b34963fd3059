//! Mapping of command failures to messages and exit codes

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::QypiError;

/// Exit status for failures caused by the arguments given
pub const EXIT_USAGE: u8 = 2;

/// Exit status for every other failure
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    /// The index has nothing matching the arguments
    #[error("{source}")]
    Usage {
        source: QypiError,
        hint: Option<&'static str>,
    },

    /// The index could not be queried
    #[error(transparent)]
    Query(QypiError),

    #[error("Failed to read '{}': {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Some inputs of a batched command failed; each was already reported
    #[error("{failed} of {total} lookups failed")]
    Partial { failed: usize, total: usize },
}

impl CliError {
    /// Classify a library error by whether the user or the network is at fault
    pub fn from_query(err: QypiError) -> Self {
        if err.is_resolution_failure() {
            CliError::Usage {
                source: err,
                hint: None,
            }
        } else {
            CliError::Query(err)
        }
    }

    pub fn with_hint(self, hint: &'static str) -> Self {
        match self {
            CliError::Usage { source, .. } => CliError::Usage {
                source,
                hint: Some(hint),
            },
            other => other,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage { .. } | CliError::ReadFile { .. } => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }

    /// Write the message and any hint to `err`
    pub fn report(&self, err: &mut dyn Write) -> io::Result<()> {
        writeln!(err, "Error: {}", self)?;
        if let CliError::Usage { hint: Some(hint), .. } = self {
            writeln!(err, "Hint: {}", hint)?;
        }
        Ok(())
    }
}

impl From<QypiError> for CliError {
    fn from(err: QypiError) -> Self {
        CliError::from_query(err)
    }
}
