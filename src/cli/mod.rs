//! Command-line interface
//!
//! # Modules
//!
//! - [`args`]: clap argument types for each subcommand
//! - [`handlers`]: the work done by each subcommand
//! - [`error`]: failure reporting and exit codes

pub mod args;
pub mod error;
pub mod handlers;

use std::io::Write;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

use crate::client::Qypi;
use crate::config::{DEFAULT_INDEX_URL, INDEX_URL_ENV, IndexConfig};
use args::{
    BrowseArgs, FilesArgs, InfoArgs, OwnedArgs, OwnerArgs, ReadmeArgs, ReleasesArgs, SearchArgs,
};
use error::{CliError, EXIT_FAILURE};

#[derive(Debug, Parser)]
#[command(name = "qypi")]
#[command(version, about = "Query PyPI from the command line")]
pub struct Cli {
    /// Set the index API endpoint URL
    #[arg(
        short,
        long,
        global = true,
        value_name = "URL",
        env = INDEX_URL_ENV,
        default_value = DEFAULT_INDEX_URL
    )]
    pub index_url: String,

    /// Log more details to stderr; repeat for more
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show project details
    Info(InfoArgs),
    /// View a project's long description
    Readme(ReadmeArgs),
    /// List released project versions
    Releases(ReleasesArgs),
    /// List files available for download
    Files(FilesArgs),
    /// List all projects on the index
    List,
    /// Search the index for projects or releases thereof
    Search(SearchArgs),
    /// List projects with given trove classifiers
    Browse(BrowseArgs),
    /// List project owners and maintainers
    Owner(OwnerArgs),
    /// List projects owned or maintained by a user
    Owned(OwnedArgs),
}

/// Run a parsed command line against the configured index.
///
/// Returns the process exit status. Failures are reported on `err`.
pub async fn run(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    let config = IndexConfig::new(&cli.index_url);
    debug!("Using index {}", config.index_url);

    let result = match Qypi::new(&config) {
        Ok(qypi) => dispatch(&qypi, &cli.command, out, err).await,
        Err(e) => Err(CliError::Query(e)),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            if e.report(err).is_err() {
                return EXIT_FAILURE;
            }
            e.exit_code()
        }
    }
}

async fn dispatch(
    qypi: &Qypi,
    command: &Command,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Info(args) => handlers::info(qypi, args, out).await,
        Command::Readme(args) => handlers::readme(qypi, args, out).await,
        Command::Releases(args) => handlers::releases(qypi, args, out).await,
        Command::Files(args) => handlers::files(qypi, args, out).await,
        Command::List => handlers::list(qypi, out).await,
        Command::Search(args) => handlers::search(qypi, args, out).await,
        Command::Browse(args) => handlers::browse(qypi, args, out).await,
        Command::Owner(args) => handlers::owner(qypi, args, out, err).await,
        Command::Owned(args) => handlers::owned(qypi, args, out, err).await,
    }
}
