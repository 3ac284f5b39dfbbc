// src/lib.rs
pub mod config;
pub mod metrics;
pub mod onionoo;
pub mod server;
pub mod status;
