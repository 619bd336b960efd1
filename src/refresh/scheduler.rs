//! Background reload loop.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::layered::{ConfigProvider, ReloadOutcome};
use crate::refresh::policy::RefreshPolicy;

/// Invokes `reload` on a provider at a fixed interval until cancelled.
pub struct RefreshScheduler {
    provider: Arc<dyn ConfigProvider>,
    policy: RefreshPolicy,
}

impl RefreshScheduler {
    pub fn new(provider: Arc<dyn ConfigProvider>, policy: RefreshPolicy) -> Self {
        Self { provider, policy }
    }

    /// Spawn the loop on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Run the loop until `cancel` fires.
    ///
    /// The first reload happens one full interval after the call; the
    /// initial load is the caller's job.
    pub async fn run(self, cancel: CancellationToken) {
        if !self.policy.is_enabled() {
            tracing::info!(layer = self.provider.name(), "Periodic refresh disabled");
            return;
        }

        let period = self.policy.interval();
        tracing::info!(
            layer = self.provider.name(),
            interval_secs = period.as_secs_f64(),
            "Refresh scheduler starting"
        );

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if self.reload_once(&cancel).await.is_break() {
                break;
            }
        }

        tracing::info!(layer = self.provider.name(), "Refresh scheduler received shutdown signal, exiting loop");
    }

    async fn reload_once(&self, cancel: &CancellationToken) -> ControlFlow<()> {
        let provider = Arc::clone(&self.provider);
        let token = cancel.clone();
        let cycle = tokio::spawn(async move { provider.reload(&token).await });

        match cycle.await {
            Ok(ReloadOutcome::Updated { keys }) => {
                tracing::debug!(layer = self.provider.name(), keys, "Reload cycle committed");
                ControlFlow::Continue(())
            }
            Ok(ReloadOutcome::Unchanged(reason)) => {
                tracing::debug!(layer = self.provider.name(), reason = %reason, "Reload cycle kept previous snapshot");
                ControlFlow::Continue(())
            }
            Ok(ReloadOutcome::Cancelled) => ControlFlow::Break(()),
            Err(e) if e.is_panic() => {
                tracing::error!(layer = self.provider.name(), error = %e, "Error loading configuration");
                ControlFlow::Continue(())
            }
            Err(e) => {
                // The runtime is shutting down underneath us.
                tracing::warn!(layer = self.provider.name(), error = %e, "Reload task aborted");
                ControlFlow::Break(())
            }
        }
    }
}
