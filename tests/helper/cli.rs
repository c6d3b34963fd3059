//! Running qypi in-process with captured output

use clap::Parser;
use qypi::cli::{Cli, run};

/// Exit status and captured streams of one qypi invocation
#[derive(Debug)]
pub struct Output {
    pub code: u8,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}

/// Run `qypi -i <index_url> <args>`
pub async fn run_qypi(index_url: &str, args: &[&str]) -> Output {
    let argv = ["qypi", "-i", index_url].into_iter().chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).unwrap();

    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let code = run(cli, &mut stdout, &mut stderr).await;

    Output {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}
