//! One fetch-and-decode cycle against the secret store.
//!
//! # Responsibilities
//! - Issue the KV v2 read with the token header
//! - Decode `data.data` into a flat mapping
//! - Abort promptly when the caller cancels
//!
//! # Design Decisions
//! - No retries here; the refresh loop is the retry
//! - Non-success status and shape mismatches are outcomes, not errors

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::loader::ConfigError;
use crate::layered::ConfigMap;
use crate::vault::connection::{VaultConnection, TOKEN_HEADER};
use crate::vault::types::{decode_secret, FetchError};

/// Source of secret mappings.
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Fetch the current mapping.
    async fn fetch(&self, cancel: &CancellationToken) -> Result<ConfigMap, FetchError>;
}

/// HTTP fetcher for a Vault KV v2 secret.
#[derive(Debug, Clone)]
pub struct VaultFetcher {
    client: reqwest::Client,
    connection: VaultConnection,
}

impl VaultFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(connection: VaultConnection, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vault-config/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(connection, client))
    }

    /// Create a fetcher over an existing client.
    pub fn with_client(connection: VaultConnection, client: reqwest::Client) -> Self {
        Self { client, connection }
    }

    async fn fetch_once(&self) -> Result<ConfigMap, FetchError> {
        let url = self.connection.secret_url();
        tracing::debug!(url = %url, "Fetching secret");

        let response = self
            .client
            .get(url.clone())
            .header(TOKEN_HEADER, self.connection.token().clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        decode_secret(&body)
    }
}

#[async_trait]
impl SecretFetcher for VaultFetcher {
    async fn fetch(&self, cancel: &CancellationToken) -> Result<ConfigMap, FetchError> {
        // Dropping the request future aborts the in-flight call.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.fetch_once() => result,
        }
    }
}
