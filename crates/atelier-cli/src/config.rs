//! Configuration for the Atelier CLI.
//!
//! Provides the [`AtelierConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `ATELIER_CONFIG` environment variable
//! 3. XDG default: `~/.config/atelier/config.toml`
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use atelier_content::ResourceDescriptor;
use atelier_core::traits::{ConfigProvider, ContentLocation};
use atelier_core::util::paths::expand_path;
use atelier_core::{Error, Result};
use atelier_store::{TriggerConfig, DEFAULT_SYNC_MARKER_PATH};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ATELIER_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Atelier CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Project name, used in log lines.
    pub project_name: String,

    /// Where content comes from.
    pub content: ContentConfig,

    /// HTTP client behaviour.
    pub http: HttpConfig,

    /// Change-signal refresh timing.
    pub refresh: RefreshConfig,

    /// Expected resources per sequence category.
    pub resources: ResourceDescriptor,
}

/// Content location configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// HTTP content root, e.g. `https://example.com`.
    pub base_url: Option<String>,

    /// Local content directory; takes precedence over `base_url`.
    pub root: Option<String>,

    /// Sync marker path relative to the content root; empty disables it.
    pub sync_marker: String,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures.
    pub retry_attempts: u32,

    /// First retry delay in milliseconds.
    pub retry_min_delay_ms: u64,
}

/// Refresh trigger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Minimum seconds between signal-initiated refreshes.
    pub debounce_secs: u64,

    /// Milliseconds to wait after a signal before refreshing.
    pub settle_delay_ms: u64,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            project_name: "atelier".to_string(),
            content: ContentConfig::default(),
            http: HttpConfig::default(),
            refresh: RefreshConfig::default(),
            resources: ResourceDescriptor::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            root: None,
            sync_marker: DEFAULT_SYNC_MARKER_PATH.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            retry_attempts: 2,
            retry_min_delay_ms: 200,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        let trigger = TriggerConfig::default();
        Self {
            debounce_secs: trigger.debounce.as_secs(),
            settle_delay_ms: trigger.settle_delay.as_millis() as u64,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl AtelierConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `ATELIER_CONFIG` env var
    /// 3. XDG default: `~/.config/atelier/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("ATELIER");
        env_opts.add_section("content");
        env_opts.add_section("http");
        env_opts.add_section("refresh");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.resources.validate()?;
        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        Self::resolve_config_path_with(explicit, std::env::var(CONFIG_ENV_VAR).ok())
    }

    fn resolve_config_path_with(explicit: Option<&str>, from_env: Option<String>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Some(path) = from_env {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("atelier").join("config.toml"))
    }

    /// Timing for the change trigger.
    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig {
            debounce: Duration::from_secs(self.refresh.debounce_secs),
            settle_delay: Duration::from_millis(self.refresh.settle_delay_ms),
        }
    }

    /// The sync marker path, unless disabled.
    pub fn sync_marker_path(&self) -> Option<&str> {
        let path = self.content.sync_marker.trim();
        (!path.is_empty()).then_some(path)
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `ATELIER_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "ATELIER", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for AtelierConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn content_location(&self) -> Result<ContentLocation> {
        if let Some(root) = self.content.root.as_deref().filter(|r| !r.trim().is_empty()) {
            return Ok(ContentLocation::Local(expand_path(root)));
        }
        match self.content.base_url.as_deref().map(str::trim) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(ContentLocation::Remote(url.to_string()))
            }
            Some(url) if !url.is_empty() => Err(Error::config(format!(
                "content.base_url '{url}' must start with http:// or https://"
            ))),
            _ => Err(Error::config(
                "No content location configured: set content.base_url or content.root",
            )),
        }
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
