//! Diagnostic logging to stderr
//!
//! stdout carries command output only, so log lines always go to stderr.
//! The filter comes from `$QYPI_LOG` or the number of `-v` flags.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::log_directive;

/// Install the global subscriber.
///
/// The returned guard flushes buffered log lines when dropped and must be
/// kept alive until the program exits.
pub fn init(verbosity: u8) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::try_new(log_directive(verbosity))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .without_time();

    // A subscriber installed earlier (e.g. by a test harness) wins
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();

    guard
}
