//! Ordered stack of configuration layers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::layered::provider::{ConfigMap, ConfigProvider, ReloadOutcome};

/// Configuration resolver over an ordered list of providers.
///
/// Layers are added bottom-up; later layers take precedence.
#[derive(Clone, Default)]
pub struct ConfigLayers {
    layers: Vec<Arc<dyn ConfigProvider>>,
}

impl ConfigLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top of the existing ones.
    pub fn push(&mut self, layer: Arc<dyn ConfigProvider>) {
        tracing::debug!(layer = layer.name(), position = self.layers.len(), "Adding configuration layer");
        self.layers.push(layer);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_layer(mut self, layer: Arc<dyn ConfigProvider>) -> Self {
        self.push(layer);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names, bottom first.
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// Resolve a key. The topmost layer holding the key decides, even when
    /// it holds an explicit null.
    pub fn get(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(key))
            .flatten()
    }

    /// Flatten all layers into one mapping, upper layers overwriting lower.
    pub fn merged(&self) -> ConfigMap {
        let mut merged = ConfigMap::new();
        for layer in &self.layers {
            let snapshot = layer.snapshot();
            merged.extend(snapshot.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Reload every layer in order, one at a time.
    pub async fn reload_all(&self, cancel: &CancellationToken) -> Vec<(String, ReloadOutcome)> {
        let mut outcomes = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            if cancel.is_cancelled() {
                outcomes.push((layer.name().to_string(), ReloadOutcome::Cancelled));
                continue;
            }
            let outcome = layer.reload(cancel).await;
            outcomes.push((layer.name().to_string(), outcome));
        }
        outcomes
    }
}

impl std::fmt::Debug for ConfigLayers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLayers").field("layers", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layered::snapshot::Snapshot;
    use async_trait::async_trait;

    struct StaticLayer {
        name: &'static str,
        snapshot: Snapshot,
    }

    impl StaticLayer {
        fn new(name: &'static str, entries: &[(&str, Option<&str>)]) -> Arc<Self> {
            let snapshot = Snapshot::empty();
            snapshot.replace(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                    .collect(),
            );
            Arc::new(Self { name, snapshot })
        }
    }

    #[async_trait]
    impl ConfigProvider for StaticLayer {
        fn name(&self) -> &str {
            self.name
        }

        fn snapshot(&self) -> Arc<ConfigMap> {
            self.snapshot.load()
        }

        async fn reload(&self, _cancel: &CancellationToken) -> ReloadOutcome {
            ReloadOutcome::Updated { keys: self.snapshot.len() }
        }
    }

    fn layers() -> ConfigLayers {
        ConfigLayers::new()
            .with_layer(StaticLayer::new(
                "file",
                &[("db:host", Some("localhost")), ("db:user", Some("app")), ("feature", Some("on"))],
            ))
            .with_layer(StaticLayer::new("vault", &[("db:host", Some("db.internal")), ("feature", None)]))
    }

    #[test]
    fn test_upper_layer_wins() {
        let layers = layers();
        assert_eq!(layers.get("db:host").as_deref(), Some("db.internal"));
        assert_eq!(layers.get("db:user").as_deref(), Some("app"));
        assert_eq!(layers.get("missing"), None);
        assert_eq!(layers.names(), vec!["file", "vault"]);
    }

    #[test]
    fn test_null_shadows_lower_value() {
        assert_eq!(layers().get("feature"), None);
    }

    #[test]
    fn test_merged() {
        let merged = layers().merged();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("db:host"), Some(&Some("db.internal".to_string())));
        assert_eq!(merged.get("feature"), Some(&None));
    }

    #[tokio::test]
    async fn test_reload_all_stops_after_cancel() {
        let layers = layers();
        let outcomes = layers.reload_all(&CancellationToken::new()).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, outcome)| outcome.is_updated()));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcomes = layers.reload_all(&cancel).await;
        assert!(outcomes.iter().all(|(_, outcome)| *outcome == ReloadOutcome::Cancelled));
    }
}
