//! GitHub contents API remote.
//!
//! The envelope is stored as a JSON file in a repository. Reads decode the
//! base64 `content` field; writes look up the current blob `sha` first
//! because updating an existing file requires it.

use async_trait::async_trait;
use base64::Engine;
use navedit_core::storage::NavigationStorageData;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ensure_success, RemoteError, RemoteStore};
use crate::config::GitHubConfig;

/// Public GitHub API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const COMMIT_MESSAGE: &str = "Update navigation data";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Contents API client bound to one file in one repository.
pub struct GitHubRemote {
    client: reqwest::Client,
    api_url: String,
    config: GitHubConfig,
}

impl GitHubRemote {
    pub fn new(config: GitHubConfig) -> Self {
        Self::with_api_url(config, GITHUB_API_URL)
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    pub fn with_api_url(config: GitHubConfig, api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            config,
        }
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.config.owner,
            self.config.repo,
            self.config.path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, token: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.contents_url())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, "navedit")
    }

    /// Current file metadata, or `None` when the file does not exist yet.
    async fn fetch(&self, token: &str) -> Result<Option<ContentsResponse>, RemoteError> {
        let response = self
            .request(reqwest::Method::GET, token)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        Ok(Some(response.json().await?))
    }
}

/// Decode the contents API's base64 payload, which is wrapped with newlines.
fn decode_content(content: &str) -> Result<NavigationStorageData, RemoteError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::Decode(e.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl RemoteStore for GitHubRemote {
    fn name(&self) -> &str {
        "github"
    }

    async fn load(&self) -> Result<Option<NavigationStorageData>, RemoteError> {
        let Some(token) = self.config.token.as_deref() else {
            tracing::debug!("No GitHub token configured, skipping remote load");
            return Ok(None);
        };
        match self.fetch(token).await? {
            Some(file) => decode_content(&file.content).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, data: &NavigationStorageData) -> Result<(), RemoteError> {
        let token = self.config.token.as_deref().ok_or(RemoteError::MissingToken)?;
        let sha = self.fetch(token).await?.map(|file| file.sha);

        let json = serde_json::to_string_pretty(data)?;
        let body = PutContentsRequest {
            message: COMMIT_MESSAGE,
            content: base64::engine::general_purpose::STANDARD.encode(json),
            branch: &self.config.branch,
            sha,
        };
        let response = self
            .request(reqwest::Method::PUT, token)
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;

        tracing::info!(
            owner = %self.config.owner,
            repo = %self.config.repo,
            path = %self.config.path,
            "Committed navigation data to GitHub",
        );
        Ok(())
    }
}
