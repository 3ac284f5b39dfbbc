// src/status/service.rs
// Turns one Onionoo fetch into one StatusSummary, or one 503.

use super::summary::{RelayCounts, StatusSummary};
use crate::metrics::{MetricsCollector, Timer};
use crate::onionoo::{RelayDirectory, UpstreamError};
use crate::server::response::json_response;
use futures::FutureExt;
use hyper::{Body, Response, StatusCode};
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct StatusService {
    directory: Arc<dyn RelayDirectory>,
    source: String,
    metrics: Option<Arc<MetricsCollector>>,
}

impl StatusService {
    pub fn new(
        directory: Arc<dyn RelayDirectory>,
        source: impl Into<String>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            directory,
            source: source.into(),
            metrics,
        }
    }

    /// Fetches the running relays and summarises them. Every failure,
    /// including a panic while summarising, comes back as `UpstreamUnavailable`.
    pub async fn summary(&self) -> Result<StatusSummary, StatusError> {
        match AssertUnwindSafe(self.compute()).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(%message, "panic while building status summary");
                Err(StatusError::UpstreamUnavailable(message))
            }
        }
    }

    async fn compute(&self) -> Result<StatusSummary, StatusError> {
        let timer = Timer::new();
        let fetched = self.directory.running_relays().await;

        if let Some(metrics) = &self.metrics {
            metrics.record_upstream(fetched.is_ok(), timer.elapsed());
        }

        let document = fetched.map_err(|e| {
            warn!(error = %e, "relay directory unavailable");
            StatusError::from(e)
        })?;

        let counts = RelayCounts::tally(&document.relays);
        info!(
            relays = counts.relays,
            guards = counts.guards,
            exits = counts.exits,
            "tor network status computed"
        );

        Ok(StatusSummary::online(counts, self.source.as_str()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("{0}")]
    UpstreamUnavailable(String),
}

impl From<UpstreamError> for StatusError {
    fn from(err: UpstreamError) -> Self {
        StatusError::UpstreamUnavailable(err.to_string())
    }
}

impl From<StatusError> for Response<Body> {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::UpstreamUnavailable(detail) => {
                json_response(StatusCode::SERVICE_UNAVAILABLE, &json!({ "detail": detail }))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure while building status summary".to_string()
    }
}
