//! vault-config
//!
//! Layered configuration for a process: a TOML settings file at the bottom,
//! a HashiCorp Vault KV v2 secret on top, refreshed in the background.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        CONFIG LAYERS                         │
//!   │                                                              │
//!   │   get(key) ──▶ ┌──────────────┐   miss   ┌──────────────┐    │
//!   │                │ vault layer  │ ───────▶ │  file layer  │    │
//!   │                │  (snapshot)  │          │  (snapshot)  │    │
//!   │                └──────▲───────┘          └──────▲───────┘    │
//!   │                       │ swap                    │ swap       │
//!   │                ┌──────┴───────┐          ┌──────┴───────┐    │
//!   │                │   refresh    │          │   watcher    │    │
//!   │                │  scheduler   │          │   (notify)   │    │
//!   │                └──────┬───────┘          └──────────────┘    │
//!   │                       │ GET v1/{mount}/data/{path}           │
//!   └───────────────────────┼──────────────────────────────────────┘
//!                           ▼
//!                     Vault server
//! ```

use std::collections::BTreeMap;
use std::error::Error;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use vault_config::config::{load_settings, AppSettings, ConfigError};
use vault_config::lifecycle::{self, signals::shutdown_signal, Mode, Shutdown};
use vault_config::observability::{logging, metrics};
use vault_config::vault::{SecretFetcher, VaultConnection, VaultFetcher};

#[derive(Parser)]
#[command(name = "vault-config")]
#[command(about = "Layered configuration with periodic Vault refresh", long_about = None)]
struct Cli {
    /// Settings file.
    #[arg(short, long, default_value = "vault-config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the settings file
    Check,
    /// Fetch the Vault secret once and print it
    Fetch,
    /// Resolve one key through all layers
    Get {
        /// Key in "section:key" form
        key: String,
    },
    /// Keep configuration fresh until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check(&cli.config),
        Commands::Fetch => fetch(&bootstrap(&cli.config)?).await,
        Commands::Get { key } => get(&bootstrap(&cli.config)?, &cli.config, &key).await,
        Commands::Watch => watch(&bootstrap(&cli.config)?, &cli.config).await,
    }
}

fn bootstrap(path: &Path) -> Result<AppSettings, ConfigError> {
    let settings = load_settings(path)?;
    logging::init_logging(&settings.logging);
    tracing::debug!(path = ?path, vault = ?settings.vault, "Settings loaded");
    Ok(settings)
}

fn check(path: &Path) -> Result<(), Box<dyn Error>> {
    match load_settings(path) {
        Ok(settings) => {
            let vault = if settings.vault.enabled { "enabled" } else { "disabled" };
            println!("{}: ok (vault {})", path.display(), vault);
            Ok(())
        }
        Err(ConfigError::Validation(errors)) => {
            eprintln!("{}: {} validation error(s)", path.display(), errors.len());
            for error in &errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn fetch(settings: &AppSettings) -> Result<(), Box<dyn Error>> {
    if !settings.vault.enabled {
        return Err("vault is disabled in settings".into());
    }

    let connection = VaultConnection::from_settings(&settings.vault)?;
    let fetcher = VaultFetcher::new(connection, settings.vault.timeout())?;

    let shutdown = Shutdown::new();
    let interrupt = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        })
    };

    let result = fetcher.fetch(&shutdown.token()).await;
    interrupt.abort();

    match result {
        Ok(map) => {
            let sorted: BTreeMap<_, _> = map.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("unchanged: {}", e);
            std::process::exit(1);
        }
    }
}

async fn get(settings: &AppSettings, path: &Path, key: &str) -> Result<(), Box<dyn Error>> {
    let shutdown = Shutdown::new();
    let running = lifecycle::start(settings, path, &shutdown, Mode::Once).await?;

    match running.layers().get(key) {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => {
            eprintln!("{}: not set", key);
            std::process::exit(1);
        }
    }
}

async fn watch(settings: &AppSettings, path: &Path) -> Result<(), Box<dyn Error>> {
    if settings.metrics.enabled {
        let addr: SocketAddr = settings.metrics.address.parse()?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let running = lifecycle::start(settings, path, &shutdown, Mode::Background).await?;

    let layers = running.layers();
    tracing::info!(
        layers = ?layers.names(),
        keys = layers.merged().len(),
        "Configuration ready"
    );

    shutdown_signal().await;
    shutdown.trigger();
    running.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
