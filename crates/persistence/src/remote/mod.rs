//! Remote copies of the navigation envelope.
//!
//! [`LocalApiRemote`] talks to the local save server during development;
//! [`GitHubRemote`] commits the envelope to a repository through the
//! contents API. [`remote_from_config`] picks one.

pub mod github;
pub mod local_api;

use std::sync::Arc;

use async_trait::async_trait;
use navedit_core::storage::NavigationStorageData;

use crate::config::PersistenceConfig;

pub use github::GitHubRemote;
pub use local_api::LocalApiRemote;

/// Errors from a [`RemoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote returned a non-2xx status code.
    #[error("Remote API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("GitHub token is not configured")]
    MissingToken,

    /// The remote content could not be decoded into an envelope.
    #[error("Failed to decode remote content: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Async remote destination for the envelope.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the stored envelope. "Nothing stored" is `Ok(None)`.
    async fn load(&self) -> Result<Option<NavigationStorageData>, RemoteError>;

    async fn save(&self, data: &NavigationStorageData) -> Result<(), RemoteError>;
}

/// Select the remote destination: the local save server in local mode,
/// otherwise GitHub when a repository is configured.
pub fn remote_from_config(config: &PersistenceConfig) -> Option<Arc<dyn RemoteStore>> {
    if config.local_mode {
        return Some(Arc::new(LocalApiRemote::new(config.local_api_url.clone())));
    }
    config
        .github
        .clone()
        .map(|github| Arc::new(GitHubRemote::new(github)) as Arc<dyn RemoteStore>)
}

/// Return the response unchanged on success, or an
/// [`RemoteError::ApiError`] with the status and body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(RemoteError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
