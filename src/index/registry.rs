//! Traits for talking to a package index

#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::index::types::{ProjectPayload, ProjectVersion};
use crate::version::error::QypiError;

/// JSON metadata endpoints of a package index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageIndex: Send + Sync {
    /// Fetches project-wide metadata: the default version plus every release's files
    ///
    /// # Returns
    /// * `Err(QypiError::ProjectNotFound)` - If the index has no such project
    async fn fetch_project(&self, name: &str) -> Result<ProjectPayload, QypiError>;

    /// Fetches metadata for exactly one version of a project
    ///
    /// # Returns
    /// * `Err(QypiError::VersionNotFound)` - If the project has no such version
    async fn fetch_project_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ProjectVersion, QypiError>;
}

/// Legacy remote procedure call surface of a package index
///
/// Parameters and results are plain JSON values; no domain-specific error
/// mapping happens at this layer.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, QypiError>;
}
