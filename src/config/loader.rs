//! Settings loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppSettings, VaultSettings};
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for settings loading and provider construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables overriding `[vault]` fields.
pub const ENV_OVERRIDES: [&str; 4] = ["VAULT_ADDR", "VAULT_TOKEN", "VAULT_MOUNT", "VAULT_PATH"];

/// Read a file and parse it as a TOML table.
pub fn read_toml_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = read(path)?;
    Ok(content.parse::<toml::Table>()?)
}

/// Parse settings from TOML text without environment overrides or validation.
pub fn parse_settings(content: &str) -> Result<AppSettings, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load, apply environment overrides, and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<AppSettings, ConfigError> {
    let content = read(path)?;
    let mut settings = parse_settings(&content)?;

    apply_env_overrides(&mut settings.vault, |name| std::env::var(name).ok());

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Replace `[vault]` fields with non-empty values returned by `lookup`.
pub fn apply_env_overrides<F>(settings: &mut VaultSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for name in ENV_OVERRIDES {
        let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let field = match name {
            "VAULT_ADDR" => &mut settings.address,
            "VAULT_TOKEN" => &mut settings.token,
            "VAULT_MOUNT" => &mut settings.mount,
            _ => &mut settings.path,
        };
        tracing::debug!(variable = name, "Applying environment override");
        *field = value;
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_env_overrides_replace_non_empty_values() {
        let env: HashMap<&str, &str> = [("VAULT_ADDR", "https://vault.internal:8200"), ("VAULT_TOKEN", "s.env"), ("VAULT_PATH", "  ")]
            .into_iter()
            .collect();

        let mut settings = VaultSettings {
            path: "from/file".to_string(),
            ..VaultSettings::default()
        };
        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.address, "https://vault.internal:8200");
        assert_eq!(settings.token, "s.env");
        assert_eq!(settings.mount, "secret");
        assert_eq!(settings.path, "from/file");
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vault]\nenabled = true\naddress = \"http://127.0.0.1:8200\"\ntoken = \"t\"\nmount = \"\"\npath = \"\"").unwrap();

        match load_settings(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert!(fields.contains(&"vault.mount"));
                assert!(fields.contains(&"vault.path"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings(Path::new("/nonexistent/settings.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/settings.toml"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_settings("[vault"), Err(ConfigError::Parse(_))));
    }
}
