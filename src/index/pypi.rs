//! PyPI JSON API client for project and version metadata

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::index::registry::PackageIndex;
use crate::index::types::{ProjectPayload, ProjectVersion};
use crate::version::error::{QypiError, TransportError};

/// PyPI JSON API client
pub struct PypiJsonIndex {
    client: Client,
    config: IndexConfig,
}

impl PypiJsonIndex {
    pub fn new(config: IndexConfig) -> Result<Self, QypiError> {
        Ok(Self::with_client(config.http_client()?, config))
    }

    pub fn with_client(client: Client, config: IndexConfig) -> Self {
        Self { client, config }
    }

    /// GET `url`, returning `Ok(None)` on 404 so the caller can pick the
    /// not-found error that fits.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, QypiError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response, url)?;
        let body = response.json().await.map_err(|e| {
            warn!("Failed to parse index response from {}: {}", url, e);
            TransportError::InvalidResponse(e.to_string())
        })?;

        Ok(Some(body))
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!("Index returned status {}: {}", status, url);
    Err(TransportError::Status {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

#[async_trait]
impl PackageIndex for PypiJsonIndex {
    async fn fetch_project(&self, name: &str) -> Result<ProjectPayload, QypiError> {
        let url = self.config.project_url(name);
        let payload: ProjectPayload = self
            .get_json(&url)
            .await?
            .ok_or_else(|| QypiError::ProjectNotFound {
                name: name.to_string(),
            })?;

        debug!(
            "Found {} releases for project {}",
            payload.releases.len(),
            name
        );
        Ok(payload)
    }

    async fn fetch_project_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ProjectVersion, QypiError> {
        let url = self.config.version_url(name, version);
        self.get_json(&url)
            .await?
            .ok_or_else(|| QypiError::VersionNotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
    }
}
