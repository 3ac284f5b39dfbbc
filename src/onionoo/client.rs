// src/onionoo/client.rs
use super::model::DetailsDocument;
use super::RelayDirectory;
use crate::config::UpstreamConfig;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("upstream request failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{status} returned by {url}")]
    Status { url: String, status: StatusCode },

    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only client for the Onionoo `details` endpoint.
#[derive(Debug, Clone)]
pub struct OnionooClient {
    client: Client,
    url: Url,
    timeout_secs: u64,
}

impl OnionooClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the currently running relays with only their nickname and flags.
    pub async fn fetch_running_relays(&self) -> Result<DetailsDocument, UpstreamError> {
        let start = Instant::now();
        let url = self.url.to_string();

        let response = self
            .client
            .get(self.url.clone())
            .query(&[("running", "true"), ("fields", "nickname,flags")])
            .header(header::ACCEPT_ENCODING, "gzip")
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "upstream returned non-success status");
            return Err(UpstreamError::Status { url, status });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        let document: DetailsDocument = serde_json::from_slice(&body)
            .map_err(|source| UpstreamError::Decode { url: url.clone(), source })?;

        debug!(
            relays = document.relays.len(),
            version = ?document.version,
            published = ?document.relays_published,
            truncated = ?document.relays_truncated,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched relay details"
        );

        Ok(document)
    }

    fn request_error(&self, err: reqwest::Error) -> UpstreamError {
        let url = self.url.to_string();
        if err.is_timeout() {
            UpstreamError::Timeout { url, secs: self.timeout_secs }
        } else {
            UpstreamError::Request { url, source: err }
        }
    }
}

#[async_trait]
impl RelayDirectory for OnionooClient {
    async fn running_relays(&self) -> Result<DetailsDocument, UpstreamError> {
        self.fetch_running_relays().await
    }
}
