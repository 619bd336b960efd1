//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the layer stack from validated settings
//! - Perform the initial synchronous load of every layer
//! - Start background tasks (refresh scheduler, file watcher)

use std::path::Path;
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::task::JoinHandle;

use crate::config::loader::ConfigError;
use crate::config::schema::AppSettings;
use crate::config::watcher::ConfigWatcher;
use crate::layered::{ConfigLayers, ConfigProvider, FileConfigProvider};
use crate::lifecycle::shutdown::Shutdown;
use crate::refresh::RefreshScheduler;
use crate::vault::VaultConfigProvider;

/// Whether background tasks are started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Initial load only.
    Once,
    /// Initial load, then periodic refresh and file watching until shutdown.
    Background,
}

/// A started configuration stack.
pub struct Running {
    layers: Arc<ConfigLayers>,
    scheduler: Option<JoinHandle<()>>,
    _watcher: Option<RecommendedWatcher>,
}

impl Running {
    pub fn layers(&self) -> Arc<ConfigLayers> {
        Arc::clone(&self.layers)
    }

    /// Wait for background tasks to finish. Trigger shutdown first.
    pub async fn join(self) {
        if let Some(handle) = self.scheduler {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Refresh scheduler terminated abnormally");
            }
        }
    }
}

/// Build and load the layer stack: the settings file below, Vault above.
///
/// When the Vault layer is enabled its initial load always runs, whatever
/// the refresh interval; a failed initial load leaves the layer empty.
pub async fn start(
    settings: &AppSettings,
    settings_path: &Path,
    shutdown: &Shutdown,
    mode: Mode,
) -> Result<Running, ConfigError> {
    let mut layers = ConfigLayers::new();

    let file = Arc::new(FileConfigProvider::new(settings_path));
    file.load_from_disk()?;
    layers.push(file.clone());

    let watcher = match mode {
        Mode::Background => Some(ConfigWatcher::new(file).run()?),
        Mode::Once => None,
    };

    let mut scheduler = None;
    if settings.vault.enabled {
        let vault = Arc::new(VaultConfigProvider::from_settings(&settings.vault)?);

        let outcome = vault.reload(&shutdown.token()).await;
        tracing::info!(outcome = outcome.label(), keys = vault.snapshot().len(), "Initial Vault load complete");
        layers.push(vault.clone());

        if mode == Mode::Background {
            let refresh = RefreshScheduler::new(vault, settings.vault.refresh_policy());
            scheduler = Some(refresh.spawn(shutdown.token()));
        }
    } else {
        tracing::info!("Vault layer disabled");
    }

    Ok(Running {
        layers: Arc::new(layers),
        scheduler,
        _watcher: watcher,
    })
}
