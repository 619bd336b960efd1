//! File-backed configuration layer.
//!
//! Flattens a TOML document into `section:key` entries. Arrays are indexed
//! (`servers:0:host`). Scalars are rendered with their TOML text form.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::loader::{read_toml_table, ConfigError};
use crate::layered::provider::{ConfigMap, ConfigProvider, ReloadOutcome};
use crate::layered::snapshot::{Snapshot, SnapshotDiff};
use crate::observability::metrics;

/// Separator between path segments of flattened keys.
pub const KEY_DELIMITER: &str = ":";

/// Configuration layer reading a TOML file from disk.
#[derive(Debug)]
pub struct FileConfigProvider {
    path: PathBuf,
    snapshot: Snapshot,
}

impl FileConfigProvider {
    /// Create a provider for `path`. Nothing is read until the first load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: Snapshot::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and flatten the file, replacing the snapshot on success.
    ///
    /// On error the previous snapshot is kept.
    pub fn load_from_disk(&self) -> Result<usize, ConfigError> {
        let outcome = read_toml_table(&self.path).map(|table| {
            let next = flatten_table(&table);
            let keys = next.len();
            SnapshotDiff::between(&self.snapshot.load(), &next).log(self.name());
            self.snapshot.replace(next);
            keys
        });

        let recorded = match &outcome {
            Ok(keys) => ReloadOutcome::Updated { keys: *keys },
            Err(e) => ReloadOutcome::Unchanged(e.to_string()),
        };
        metrics::record_reload(self.name(), &recorded);
        outcome
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn snapshot(&self) -> Arc<ConfigMap> {
        self.snapshot.load()
    }

    async fn reload(&self, cancel: &CancellationToken) -> ReloadOutcome {
        if cancel.is_cancelled() {
            return ReloadOutcome::Cancelled;
        }
        match self.load_from_disk() {
            Ok(keys) => ReloadOutcome::Updated { keys },
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to reload config file, keeping current snapshot");
                ReloadOutcome::Unchanged(e.to_string())
            }
        }
    }
}

/// Flatten a TOML table into delimiter-joined keys.
pub fn flatten_table(table: &toml::Table) -> ConfigMap {
    let mut out = ConfigMap::new();
    for (key, value) in table {
        flatten_value(key, value, &mut out);
    }
    out
}

fn flatten_value(prefix: &str, value: &toml::Value, out: &mut ConfigMap) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                flatten_value(&join_key(prefix, key), child, out);
            }
        }
        toml::Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(&join_key(prefix, &index.to_string()), child, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix.to_string(), Some(s.clone()));
        }
        other => {
            out.insert(prefix.to_string(), Some(other.to_string()));
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    format!("{}{}{}", prefix, KEY_DELIMITER, key)
}
