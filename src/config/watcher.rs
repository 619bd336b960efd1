//! Settings file watcher for hot reload of the file layer.

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::layered::FileConfigProvider;

/// A watcher that reloads a file layer whenever its file changes.
pub struct ConfigWatcher {
    provider: Arc<FileConfigProvider>,
}

impl ConfigWatcher {
    pub fn new(provider: Arc<FileConfigProvider>) -> Self {
        Self { provider }
    }

    /// Start watching the file on notify's background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let provider = Arc::clone(&self.provider);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?provider.path(), "Config file change detected, reloading");
                        if let Err(e) = provider.load_from_disk() {
                            tracing::error!(error = %e, "Failed to reload config file. Keeping current configuration.");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.provider.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.provider.path(), "Config watcher started");
        Ok(watcher)
    }
}
