//! Logging setup
//!
//! stdout carries the MCP protocol, so every log line goes to stderr.
//! Configuration comes from the environment:
//! - `K8S_MARIADB_MANIFESTS_LOG`: filter directives (falls back to `RUST_LOG`, then `info`)
//! - `K8S_MARIADB_MANIFESTS_LOG_FORMAT`: `text` (default) or `json`

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "K8S_MARIADB_MANIFESTS_LOG";
pub const LOG_FORMAT_ENV: &str = "K8S_MARIADB_MANIFESTS_LOG_FORMAT";
const DEFAULT_FILTER: &str = "info";

/// Errors that can occur during telemetry initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directives could not be parsed
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// Failed to initialize tracing subscriber
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration for telemetry initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Text,
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|f| !f.trim().is_empty());
        let filter = non_blank(LOG_ENV)
            .or_else(|| non_blank("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self { filter, format }
    }
}

/// Install the global tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_new(&config.filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.filter.clone(),
            reason: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> TelemetryConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TelemetryConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_info_text() {
        assert_eq!(config_from(&[]), TelemetryConfig::default());
    }

    #[test]
    fn own_variable_wins_over_rust_log() {
        let config = config_from(&[(LOG_ENV, "k8s_mariadb_manifests=debug"), ("RUST_LOG", "warn")]);
        assert_eq!(config.filter, "k8s_mariadb_manifests=debug");

        let config = config_from(&[("RUST_LOG", "warn")]);
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(config_from(&[(LOG_ENV, "  ")]).filter, "info");
    }

    #[test]
    fn blank_filter_defers_to_rust_log() {
        let config = config_from(&[(LOG_ENV, ""), ("RUST_LOG", "warn")]);
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn json_format_is_case_insensitive() {
        assert_eq!(config_from(&[(LOG_FORMAT_ENV, "JSON")]).format, LogFormat::Json);
        assert_eq!(config_from(&[(LOG_FORMAT_ENV, "pretty")]).format, LogFormat::Text);
    }

    #[test]
    fn invalid_filter_is_reported() {
        let config = TelemetryConfig {
            filter: "k8s_mariadb_manifests=loudest".to_string(),
            format: LogFormat::Text,
        };
        let err = init_telemetry(&config).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }
}
