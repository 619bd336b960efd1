//! Remote secret store integration.
//!
//! # Data Flow
//! ```text
//! VaultSettings
//!     → connection.rs (descriptor: address, token, mount, path)
//!     → fetcher.rs (GET {address}/v1/{mount}/data/{path}, decode data.data)
//!     → provider.rs (swap snapshot on success, keep it otherwise)
//!     → layered::ConfigLayers
//! ```
//!
//! # Security Constraints
//! - The token is only ever sent in the `X-Vault-Token` header
//! - Never log the token or secret values (key names only)
//! - Every request has a timeout and honours cancellation

pub mod connection;
pub mod fetcher;
pub mod provider;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{VaultConnection, TOKEN_HEADER};
pub use fetcher::{SecretFetcher, VaultFetcher};
pub use provider::VaultConfigProvider;
pub use types::FetchError;
