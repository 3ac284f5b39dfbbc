// src/status/mod.rs
mod service;
mod summary;

pub use service::{StatusError, StatusService};
pub use summary::{NetworkStatus, RelayCounts, StatusSummary};
