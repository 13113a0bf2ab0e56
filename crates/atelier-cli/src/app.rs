//! Atelier CLI application.
//!
//! Wires configuration to a content source and store, initialises
//! logging, and dispatches commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use atelier_core::traits::{ConfigProvider, ContentLocation};
use atelier_core::{Error, Result};
use atelier_store::{ContentSource, ContentStore, FsSource, HttpSource, RetrySource};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::AtelierConfig;
use crate::{config_handlers, sync, watch};

/// The CLI application.
pub struct AtelierCli {
    name: String,
    config: Arc<AtelierConfig>,
    version: String,
}

impl AtelierCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = AtelierConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: AtelierConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &AtelierConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    /// Logs go to stderr so stdout stays machine-readable.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Build the content source described by the configuration.
    ///
    /// HTTP sources are wrapped in a retry layer; local directories are not.
    pub fn build_source(&self) -> Result<Arc<dyn ContentSource>> {
        let location = self.config.content_location()?;
        info!(project = self.config.project_name(), content = %location.describe(), "content location");
        match location {
            ContentLocation::Remote(url) => {
                let http = &self.config.http;
                let source =
                    HttpSource::with_timeout(url, Duration::from_secs(http.timeout_secs))?;
                Ok(Arc::new(
                    RetrySource::new(Arc::new(source))
                        .with_max_attempts(http.retry_attempts)
                        .with_initial_delay(Duration::from_millis(http.retry_min_delay_ms)),
                ))
            }
            ContentLocation::Local(root) => Ok(Arc::new(FsSource::new(root))),
        }
    }

    /// Build a store over the configured source.
    pub fn build_store(&self) -> Result<Arc<ContentStore>> {
        let source = self.build_source()?;
        let store = ContentStore::new(source, self.config.resources.clone());
        let store = match self.config.sync_marker_path() {
            Some(path) => store.with_sync_marker(path),
            None => store,
        };
        Ok(Arc::new(store))
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        match args.command {
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Load { pretty }) => self.cmd_load(pretty).await,
            Some(Command::Watch) => {
                let store = self.build_store()?;
                let input = BufReader::new(tokio::io::stdin());
                watch::run_watch(store, self.config.trigger_config(), input).await?;
                Ok(())
            }
            Some(Command::Sync {
                from,
                to,
                message,
                watch: true,
            }) => {
                let resyncs = sync::watch_content(
                    Path::new(&from),
                    Path::new(&to),
                    message.as_deref(),
                    sync::SYNC_DEBOUNCE,
                    ctrl_c(),
                )
                .await?;
                println!("Stopped watching {from} after {resyncs} re-syncs");
                Ok(())
            }
            Some(Command::Sync {
                from, to, message, ..
            }) => {
                let summary =
                    sync::sync_content(Path::new(&from), Path::new(&to), message.as_deref())
                        .await?;
                println!(
                    "Synced {} files from {} directories; marker at {}",
                    summary.files_copied,
                    summary.directories.len(),
                    summary.marker_path.display()
                );
                Ok(())
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {} - use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    async fn cmd_load(&self, pretty: bool) -> Result<()> {
        let store = self.build_store()?;
        store.refresh().await;
        let snapshot = store.snapshot();
        let json = if pretty {
            serde_json::to_string_pretty(&*snapshot)
        } else {
            serde_json::to_string(&*snapshot)
        }
        .map_err(|e| Error::serialization(e.to_string()))?;
        println!("{json}");
        Ok(())
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Tests
// ============================================================================
