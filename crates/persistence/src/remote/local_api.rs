//! Client for the local save server's `/api/navigation` endpoint.

use async_trait::async_trait;
use navedit_core::storage::{NavigationStorageData, LOCAL_API_PATH};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{ensure_success, RemoteError, RemoteStore};

/// `{ "data": ... }` response envelope used by the save server.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// HTTP client for a local save server.
pub struct LocalApiRemote {
    client: reqwest::Client,
    base_url: String,
}

impl LocalApiRemote {
    /// * `base_url` - e.g. `http://localhost:4322`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, LOCAL_API_PATH)
    }
}

#[async_trait]
impl RemoteStore for LocalApiRemote {
    fn name(&self) -> &str {
        "local-api"
    }

    async fn load(&self) -> Result<Option<NavigationStorageData>, RemoteError> {
        let response = self.client.get(self.url()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        let envelope: DataEnvelope<NavigationStorageData> = response.json().await?;
        Ok(Some(envelope.data))
    }

    async fn save(&self, data: &NavigationStorageData) -> Result<(), RemoteError> {
        let response = self.client.post(self.url()).json(data).send().await?;
        ensure_success(response).await?;
        tracing::debug!(url = %self.url(), "Saved navigation to local API");
        Ok(())
    }
}
