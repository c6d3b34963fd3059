use std::time::Duration;

use crate::version::error::QypiError;

// =============================================================================
// Index endpoints
// =============================================================================

/// Default index root serving both the JSON API and XML-RPC
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

/// Environment variable overriding the index root
pub const INDEX_URL_ENV: &str = "QYPI_INDEX_URL";

/// Timeout for a single request in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Logging
// =============================================================================

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "QYPI_LOG";

/// Connection settings for one index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub index_url: String,
    pub timeout: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL)
    }
}

impl IndexConfig {
    pub fn new(index_url: &str) -> Self {
        Self {
            index_url: index_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
        }
    }

    /// URL of the project-wide JSON document
    pub fn project_url(&self, project: &str) -> String {
        format!("{}/{}/json", self.index_url, project)
    }

    /// URL of the JSON document for one version
    pub fn version_url(&self, project: &str, version: &str) -> String {
        format!("{}/{}/{}/json", self.index_url, project, version)
    }

    /// Endpoint receiving XML-RPC calls
    pub fn rpc_url(&self) -> &str {
        &self.index_url
    }

    /// Build the HTTP client shared by the JSON and XML-RPC transports
    pub fn http_client(&self) -> Result<reqwest::Client, QypiError> {
        Ok(reqwest::Client::builder()
            .user_agent(user_agent())
            .timeout(self.timeout)
            .build()?)
    }
}

/// User-Agent sent with every request
pub fn user_agent() -> String {
    format!(
        "{}/{} ({}) reqwest",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    )
}

/// Returns the filter directive for the log subscriber.
/// Uses $QYPI_LOG if set, otherwise derives a level from the number of
/// `-v` flags given.
pub fn log_directive(verbosity: u8) -> String {
    log_directive_with_env(std::env::var(LOG_ENV).ok(), verbosity)
}

fn log_directive_with_env(env_value: Option<String>, verbosity: u8) -> String {
    if let Some(directive) = env_value.filter(|d| !d.trim().is_empty()) {
        return directive;
    }

    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}
