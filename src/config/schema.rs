//! Settings schema definitions.
//!
//! This module defines the settings consumed by the provider wiring.
//! All types derive Serde traits for deserialization from the settings file.
//! Tables not listed here are application configuration and only reach the
//! process through the file layer.

use std::time::Duration;

use serde::Deserialize;

use crate::refresh::RefreshPolicy;

/// Root settings for the process.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    /// Remote secret store connection and refresh cadence.
    pub vault: VaultSettings,

    /// Log output settings.
    pub logging: LoggingSettings,

    /// Prometheus exporter settings.
    pub metrics: MetricsSettings,
}

/// Remote secret store settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// Enable the Vault layer.
    pub enabled: bool,

    /// Base address (e.g., "http://127.0.0.1:8200").
    pub address: String,

    /// Token sent in the `X-Vault-Token` header.
    pub token: String,

    /// KV v2 mount (e.g., "secret").
    pub mount: String,

    /// Secret path under the mount (e.g., "app/config").
    pub path: String,

    /// Refresh interval in seconds. 0 disables periodic refresh.
    pub interval_secs: u64,

    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl VaultSettings {
    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "http://127.0.0.1:8200".to_string(),
            token: String::new(),
            mount: "secret".to_string(),
            path: String::new(),
            interval_secs: 0,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSettings")
            .field("enabled", &self.enabled)
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("mount", &self.mount)
            .field("path", &self.path)
            .field("interval_secs", &self.interval_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive (e.g., "info", "vault_config=debug").
    /// `RUST_LOG` takes precedence when set.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Metrics settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Enable the Prometheus scrape endpoint.
    pub enabled: bool,

    /// Scrape endpoint bind address.
    pub address: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0:9090".to_string(),
        }
    }
}
