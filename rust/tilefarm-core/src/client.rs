//! Worker-side client for the coordinator.
//!
//! Workers call [`CoordinatorClient::hello`] once per thread, then loop on
//! [`CoordinatorClient::request_tile`] and [`CoordinatorClient::report_done`].
//! An empty `/tile` response is returned as `None`; it means either that the
//! cluster is not complete yet or that every tile has been handed out, and
//! the caller decides how long to wait before asking again.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, TilefarmError};
use crate::protocol::{self, TileAssignment};
use crate::tiles::TileId;

/// Connection settings for [`HttpCoordinatorClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coordinator address, e.g. `http://10.0.0.1:8080`.
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Trait for coordinator client implementations.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Register one worker thread.
    async fn hello(&self) -> Result<()>;

    /// Ask for the next tile. `None` means no work is available right now.
    async fn request_tile(&self) -> Result<Option<TileAssignment>>;

    /// Report a tile as rendered.
    async fn report_done(&self, tile: TileId) -> Result<()>;
}

/// HTTP coordinator client.
#[derive(Debug, Clone)]
pub struct HttpCoordinatorClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpCoordinatorClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| TilefarmError::client_with_source("failed to build HTTP client", e))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path_and_query: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TilefarmError::client_with_source(format!("GET {url} failed"), e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TilefarmError::client(format!(
                "GET {url} returned {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TilefarmError::client_with_source(format!("GET {url}: unreadable body"), e))
    }
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn hello(&self) -> Result<()> {
        self.get(protocol::HELLO_PATH).await.map(|_| ())
    }

    async fn request_tile(&self) -> Result<Option<TileAssignment>> {
        let body = self.get(protocol::TILE_PATH).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        body.parse().map(Some)
    }

    async fn report_done(&self, tile: TileId) -> Result<()> {
        let path = format!(
            "{}?{}={}",
            protocol::DONE_PATH,
            protocol::DONE_QUERY_KEY,
            tile
        );
        self.get(&path).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpCoordinatorClient::new(ClientConfig {
            base_url: "http://coordinator:9000/".to_string(),
            request_timeout_ms: 500,
        })
        .unwrap();

        assert_eq!(client.base_url(), "http://coordinator:9000");
    }

    #[tokio::test]
    async fn test_unreachable_coordinator() {
        // Port 9 (discard) on localhost is not served in test environments.
        let client = HttpCoordinatorClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
        })
        .unwrap();

        let err = client.hello().await.unwrap_err();
        assert!(matches!(err, TilefarmError::Client { .. }));
    }
}
