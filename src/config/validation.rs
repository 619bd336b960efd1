//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Connection fields must be present when the Vault layer is enabled
//! - Addresses must parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppSettings → Result<(), Vec<ValidationError>>
//! - Runs once before any provider is constructed

use std::net::SocketAddr;

use reqwest::header::HeaderValue;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::{AppSettings, LoggingSettings, MetricsSettings, VaultSettings};

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate settings, collecting every failure.
pub fn validate_settings(settings: &AppSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_vault(&settings.vault, &mut errors);
    validate_logging(&settings.logging, &mut errors);
    validate_metrics(&settings.metrics, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_vault(vault: &VaultSettings, errors: &mut Vec<ValidationError>) {
    if !vault.enabled {
        return;
    }

    if vault.address.trim().is_empty() {
        errors.push(ValidationError::new("vault.address", "must not be empty"));
    } else {
        match Url::parse(&vault.address) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "vault.address",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("vault.address", e.to_string())),
        }
    }

    for (field, value) in [
        ("vault.token", &vault.token),
        ("vault.mount", &vault.mount),
        ("vault.path", &vault.path),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if !vault.token.trim().is_empty() && HeaderValue::from_str(&vault.token).is_err() {
        errors.push(ValidationError::new("vault.token", "contains characters not allowed in a header"));
    }

    if vault.timeout_secs == 0 {
        errors.push(ValidationError::new("vault.timeout_secs", "must be greater than 0"));
    }
}

fn validate_logging(logging: &LoggingSettings, errors: &mut Vec<ValidationError>) {
    if let Err(e) = EnvFilter::try_new(&logging.level) {
        errors.push(ValidationError::new("logging.level", e.to_string()));
    }
}

fn validate_metrics(metrics: &MetricsSettings, errors: &mut Vec<ValidationError>) {
    if metrics.enabled && metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "metrics.address",
            format!("'{}' is not a socket address", metrics.address),
        ));
    }
}
