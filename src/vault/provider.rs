//! Vault-backed configuration layer.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::loader::ConfigError;
use crate::config::schema::VaultSettings;
use crate::layered::{ConfigMap, ConfigProvider, ReloadOutcome, Snapshot, SnapshotDiff};
use crate::observability::metrics;
use crate::vault::connection::VaultConnection;
use crate::vault::fetcher::{SecretFetcher, VaultFetcher};

/// Holds the last successfully fetched mapping and replaces it on reload.
///
/// Starts empty. A failed reload, including the initial one, leaves the
/// current snapshot in place.
pub struct VaultConfigProvider<F = VaultFetcher> {
    fetcher: F,
    snapshot: Snapshot,
}

impl VaultConfigProvider<VaultFetcher> {
    /// Build a provider from validated settings. Performs no I/O.
    pub fn from_settings(settings: &VaultSettings) -> Result<Self, ConfigError> {
        let connection = VaultConnection::from_settings(settings)?;
        tracing::info!(
            address = %connection.address(),
            mount = %connection.mount(),
            path = %connection.path(),
            "Vault provider configured"
        );
        let fetcher = VaultFetcher::new(connection, settings.timeout())?;
        Ok(Self::new(fetcher))
    }
}

impl<F: SecretFetcher> VaultConfigProvider<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            snapshot: Snapshot::empty(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn commit(&self, next: ConfigMap) -> ReloadOutcome {
        let keys = next.len();
        SnapshotDiff::between(&self.snapshot.load(), &next).log(self.name());
        self.snapshot.replace(next);
        ReloadOutcome::Updated { keys }
    }
}

#[async_trait]
impl<F: SecretFetcher> ConfigProvider for VaultConfigProvider<F> {
    fn name(&self) -> &str {
        "vault"
    }

    fn snapshot(&self) -> Arc<ConfigMap> {
        self.snapshot.load()
    }

    async fn reload(&self, cancel: &CancellationToken) -> ReloadOutcome {
        let outcome = match self.fetcher.fetch(cancel).await {
            Ok(next) => self.commit(next),
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Vault reload cancelled");
                ReloadOutcome::Cancelled
            }
            Err(e) => {
                tracing::warn!(error = %e, "Vault fetch failed, keeping current configuration");
                ReloadOutcome::Unchanged(e.to_string())
            }
        };
        metrics::record_reload(self.name(), &outcome);
        outcome
    }
}

impl<F> std::fmt::Debug for VaultConfigProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfigProvider")
            .field("snapshot", &self.snapshot)
            .finish()
    }
}
