//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vault_config_reloads_total` (counter): reload cycles by layer, outcome
//! - `vault_config_keys` (gauge): keys in the layer's current snapshot

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::layered::ReloadOutcome;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one reload cycle.
pub fn record_reload(layer: &str, outcome: &ReloadOutcome) {
    metrics::counter!(
        "vault_config_reloads_total",
        "layer" => layer.to_string(),
        "outcome" => outcome.label()
    )
    .increment(1);

    if let ReloadOutcome::Updated { keys } = outcome {
        metrics::gauge!("vault_config_keys", "layer" => layer.to_string()).set(*keys as f64);
    }
}
