// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Prefix for environment overrides, e.g. `TOR_STATUS__UPSTREAM__TIMEOUT_SECS=5`.
pub const ENV_PREFIX: &str = "TOR_STATUS";

/// Load configuration from an optional file (YAML or JSON) with environment
/// overrides layered on top. A missing file falls back to defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let settings = ::config::Config::builder()
        .add_source(::config::File::from(path).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = settings
        .try_deserialize()
        .context("Failed to parse config")?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config("does-not-exist.yaml").unwrap();
        assert_eq!(config.server.route, DEFAULT_ROUTE);
        assert_eq!(config.upstream.timeout_secs, 15);
    }

    #[test]
    fn yaml_file_overrides_selected_fields() {
        let path = std::env::temp_dir().join(format!(
            "tor-network-status-{}.yaml",
            uuid::Uuid::new_v4()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "upstream:\n  timeout_secs: 3\n  url: \"http://127.0.0.1:1/details\"\nmetrics:\n  enabled: false"
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(config.upstream.url.as_str(), "http://127.0.0.1:1/details");
        assert!(!config.metrics.enabled);
        assert_eq!(config.upstream.source, DEFAULT_SOURCE);
    }
}
