//! Layered configuration with a periodically refreshed Vault layer.

pub mod config;
pub mod layered;
pub mod lifecycle;
pub mod observability;
pub mod refresh;
pub mod vault;

pub use config::AppSettings;
pub use layered::{ConfigLayers, ConfigMap, ConfigProvider, ReloadOutcome};
pub use lifecycle::Shutdown;
pub use refresh::{RefreshPolicy, RefreshScheduler};
pub use vault::{VaultConfigProvider, VaultConnection, VaultFetcher};
