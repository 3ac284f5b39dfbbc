// src/onionoo/mod.rs
mod client;
mod model;

pub use client::{OnionooClient, UpstreamError};
pub use model::{DetailsDocument, RelayRecord, EXIT_FLAG, GUARD_FLAG};

use async_trait::async_trait;

/// Anything that can report the relays currently running on the Tor network.
#[async_trait]
pub trait RelayDirectory: Send + Sync {
    async fn running_relays(&self) -> Result<DetailsDocument, UpstreamError>;
}
