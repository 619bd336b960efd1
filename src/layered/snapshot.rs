//! Atomically replaceable snapshot storage.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::layered::provider::ConfigMap;

/// Holder for a provider's current mapping.
///
/// Readers get an `Arc` to a complete mapping; writers replace the whole
/// mapping in one pointer swap.
pub struct Snapshot {
    inner: ArcSwap<ConfigMap>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self {
            inner: ArcSwap::from_pointee(ConfigMap::new()),
        }
    }

    /// Current mapping.
    pub fn load(&self) -> Arc<ConfigMap> {
        self.inner.load_full()
    }

    /// Commit a new mapping, returning the one it replaced.
    pub fn replace(&self, next: ConfigMap) -> Arc<ConfigMap> {
        self.inner.swap(Arc::new(next))
    }

    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may be secrets.
        f.debug_struct("Snapshot").field("keys", &self.len()).finish()
    }
}

/// Key-level difference between two snapshots. Carries key names only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl SnapshotDiff {
    /// Compute the difference from `old` to `new`. Key lists are sorted.
    pub fn between(old: &ConfigMap, new: &ConfigMap) -> Self {
        let mut diff = Self::default();

        for (key, value) in new {
            match old.get(key) {
                None => diff.added.push(key.clone()),
                Some(previous) if previous != value => diff.changed.push(key.clone()),
                Some(_) => {}
            }
        }
        for key in old.keys() {
            if !new.contains_key(key) {
                diff.removed.push(key.clone());
            }
        }

        diff.added.sort();
        diff.removed.sort();
        diff.changed.sort();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Emit the diff as a structured log event.
    pub fn log(&self, layer: &str) {
        if self.is_empty() {
            tracing::debug!(layer, "Configuration reloaded, no changes");
            return;
        }
        tracing::info!(
            layer,
            added = ?self.added,
            removed = ?self.removed,
            changed = ?self.changed,
            "Configuration changed"
        );
    }
}
