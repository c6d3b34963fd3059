use thiserror::Error;

#[derive(Debug, Error)]
pub enum QypiError {
    #[error("{name}: project not found")]
    ProjectNotFound { name: String },

    #[error("{name}: version {version} not found")]
    VersionNotFound { name: String, version: String },

    #[error("{name}: no matching versions found")]
    NoMatchingVersion { name: String },

    #[error("Invalid requirement '{input}': {message}")]
    InvalidRequirement { input: String, message: String },

    #[error("Malformed version '{version}': {message}")]
    MalformedVersion { version: String, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl QypiError {
    /// True for failures that describe the index contents rather than the
    /// connection to it.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            QypiError::ProjectNotFound { .. }
                | QypiError::VersionNotFound { .. }
                | QypiError::NoMatchingVersion { .. }
                | QypiError::InvalidRequirement { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Index returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },
}

impl From<reqwest::Error> for QypiError {
    fn from(err: reqwest::Error) -> Self {
        QypiError::Transport(TransportError::Network(err))
    }
}
