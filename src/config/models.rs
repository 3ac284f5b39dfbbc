// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ROUTE: &str = "/tor_network_status";
pub const DEFAULT_UPSTREAM_URL: &str = "https://onionoo.torproject.org/details";
pub const DEFAULT_SOURCE: &str = "onionoo.torproject.org";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            route: DEFAULT_ROUTE.to_string(),
        }
    }
}

/// Where relay details are fetched from and how long to wait for them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url: Url,
    pub timeout_secs: u64,
    /// Host label reported back to callers in every summary.
    pub source: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream url is valid"),
            timeout_secs: 15,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.server.route.starts_with('/') {
            bail!("server.route must start with '/': {}", self.server.route);
        }

        if self.upstream.timeout_secs == 0 {
            bail!("upstream.timeout_secs must be greater than zero");
        }

        match self.upstream.url.scheme() {
            "http" | "https" => {}
            other => bail!("upstream.url must be http or https, got {}", other),
        }

        if self.upstream.source.trim().is_empty() {
            bail!("upstream.source must not be empty");
        }

        if self.metrics.enabled {
            if !self.metrics.path.starts_with('/') {
                bail!("metrics.path must start with '/': {}", self.metrics.path);
            }
            if self.metrics.port == self.server.listen.port() {
                bail!(
                    "metrics.port {} collides with the server port",
                    self.metrics.port
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_onionoo_endpoint() {
        let config = Config::default();

        assert_eq!(config.server.route, "/tor_network_status");
        assert_eq!(config.upstream.url.as_str(), DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.timeout(), Duration::from_secs(15));
        assert_eq!(config.upstream.source, "onionoo.torproject.org");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_relative_route() {
        let mut config = Config::default();
        config.server.route = "tor_network_status".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_metrics_port_clash_only_when_enabled() {
        let mut config = Config::default();
        config.metrics.port = config.server.listen.port();
        assert!(config.validate().is_err());

        config.metrics.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_upstream() {
        let mut config = Config::default();
        config.upstream.url = Url::parse("ftp://onionoo.torproject.org/details").unwrap();
        assert!(config.validate().is_err());
    }
}
