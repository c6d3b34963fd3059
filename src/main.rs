use std::io;
use std::process::ExitCode;

use clap::Parser;

use qypi::cli::{Cli, run};
use qypi::logging;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let code = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let mut out = io::stdout().lock();
            // Unlocked so the log writer thread can interleave
            let mut err = io::stderr();
            run(cli, &mut out, &mut err).await
        });

    Ok(ExitCode::from(code))
}
