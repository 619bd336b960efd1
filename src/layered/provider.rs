//! Provider capability shared by every configuration layer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Flat key → value mapping. A `None` value is an explicit null.
pub type ConfigMap = HashMap<String, Option<String>>;

/// Result of a single reload cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new snapshot was committed.
    Updated { keys: usize },
    /// No new snapshot could be produced; the previous one is still served.
    Unchanged(String),
    /// The cycle was cancelled before it completed.
    Cancelled,
}

impl ReloadOutcome {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ReloadOutcome::Updated { .. } => "updated",
            ReloadOutcome::Unchanged(_) => "unchanged",
            ReloadOutcome::Cancelled => "cancelled",
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, ReloadOutcome::Updated { .. })
    }
}

/// Something exposing a readable mapping and a `reload` operation.
///
/// Implementations must never surface source failures from `reload`; they
/// report them as [`ReloadOutcome::Unchanged`] and keep serving the last
/// committed snapshot.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Layer name for logging/metrics.
    fn name(&self) -> &str;

    /// The most recently committed snapshot.
    fn snapshot(&self) -> Arc<ConfigMap>;

    /// Look up a key in the current snapshot.
    ///
    /// Returns `Some(None)` when the key is present with a null value.
    fn get(&self, key: &str) -> Option<Option<String>> {
        self.snapshot().get(key).cloned()
    }

    /// Run one reload cycle.
    async fn reload(&self, cancel: &CancellationToken) -> ReloadOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ReloadOutcome::Updated { keys: 3 }.label(), "updated");
        assert_eq!(ReloadOutcome::Unchanged("404".into()).label(), "unchanged");
        assert_eq!(ReloadOutcome::Cancelled.label(), "cancelled");
        assert!(ReloadOutcome::Updated { keys: 0 }.is_updated());
        assert!(!ReloadOutcome::Cancelled.is_updated());
    }
}
