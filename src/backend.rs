use crate::error::{FinviewError, Result};
use crate::types::{BackendHealth, ScanResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

/// The external scanning service.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    async fn scan(&self) -> Result<ScanResponse>;

    async fn health(&self) -> Result<BackendHealth>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    url: String,
}

impl BackendClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let unavailable = |e: reqwest::Error| {
            warn!("[Backend] GET {} failed: {}", path, e);
            FinviewError::BackendUnavailable(e.to_string())
        };

        self.client
            .get(format!("{}{}", self.url, path))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?
            .json::<T>()
            .await
            .map_err(unavailable)
    }
}

#[async_trait]
impl ScanBackend for BackendClient {
    async fn scan(&self) -> Result<ScanResponse> {
        let response: ScanResponse = self.get_json("/scan").await?;
        info!(
            "[Backend] Scan returned {} log line(s), {} signal(s), {} chart(s)",
            response.logs.len(),
            response.signals.len(),
            response.charts.len()
        );
        Ok(response)
    }

    async fn health(&self) -> Result<BackendHealth> {
        self.get_json("/health").await
    }
}
