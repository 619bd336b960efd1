//! Connection descriptor for the remote secret store.

use reqwest::header::HeaderValue;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::VaultSettings;

/// Header carrying the auth token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// How to reach one secret in the store. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultConnection {
    address: Url,
    token: HeaderValue,
    mount: String,
    path: String,
    secret_url: Url,
}

impl VaultConnection {
    /// Build a descriptor, rejecting empty fields and tokens that cannot be
    /// sent as a header value.
    ///
    /// Surrounding slashes on `mount` and `path` are ignored, and the base
    /// address is treated as a directory whether or not it ends with `/`.
    pub fn new(
        address: Url,
        token: impl Into<String>,
        mount: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let token = token.into();
        let mount = mount.into().trim_matches('/').to_string();
        let path = path.into().trim_matches('/').to_string();

        if address.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!("vault address '{}' cannot be a base URL", address)));
        }
        for (field, value) in [("token", &token), ("mount", &mount), ("path", &path)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("vault {} must not be empty", field)));
            }
        }

        let mut token = HeaderValue::from_str(&token)
            .map_err(|_| ConfigError::Invalid("vault token contains characters not allowed in a header".to_string()))?;
        token.set_sensitive(true);

        let address = with_trailing_slash(address);
        let secret_url = address
            .join(&format!("v1/{}/data/{}", mount, path))
            .map_err(|e| ConfigError::Invalid(format!("cannot build secret URL: {}", e)))?;

        Ok(Self {
            address,
            token,
            mount,
            path,
            secret_url,
        })
    }

    /// Build a descriptor from validated settings.
    pub fn from_settings(settings: &VaultSettings) -> Result<Self, ConfigError> {
        let address = Url::parse(&settings.address).map_err(|e| {
            ConfigError::Invalid(format!("invalid vault address '{}': {}", settings.address, e))
        })?;
        Self::new(address, settings.token.clone(), settings.mount.clone(), settings.path.clone())
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Token as the `X-Vault-Token` header value. Marked sensitive.
    pub fn token(&self) -> &HeaderValue {
        &self.token
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `{address}/v1/{mount}/data/{path}`
    pub fn secret_url(&self) -> &Url {
        &self.secret_url
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl std::fmt::Debug for VaultConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConnection")
            .field("address", &self.address.as_str())
            .field("token", &"<redacted>")
            .field("mount", &self.mount)
            .field("path", &self.path)
            .finish()
    }
}
