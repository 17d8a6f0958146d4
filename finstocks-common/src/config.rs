//! Configuration management for FinStocks services.
//!
//! Both binaries share one configuration file at `~/.finstocks/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (`FINSTOCKS_*`, plus the `SUPABASE_*` fallbacks)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `FINSTOCKS_DATABASE_URL` / `SUPABASE_URL` → database.url
//! - `FINSTOCKS_DATABASE_KEY` / `SUPABASE_KEY` → database.api_key
//! - `FINSTOCKS_HOST` → server.host
//! - `FINSTOCKS_PORT` → server.port
//! - `FINSTOCKS_LOG_LEVEL` → observability.log_level
//! - `FINSTOCKS_LOG_FORMAT` → observability.log_format
//! - `FINSTOCKS_CACHE_WINDOW_SECS` → cache.window_secs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".finstocks"),
        |dirs| dirs.home_dir().join(".finstocks"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default: "127.0.0.1"
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port. Default: 8000
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Connection settings for the market data store.
///
/// The URL scheme picks the backend:
/// - `http://` / `https://` → hosted REST database (requires `api_key`)
/// - `sqlite::memory:` → in-memory SQLite
/// - `sqlite://PATH` or a bare path → file-backed SQLite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database endpoint or SQLite location
    #[serde(default)]
    pub url: Option<String>,

    /// Access key for the hosted database
    #[serde(default)]
    pub api_key: Option<String>,

    /// Network timeout for hosted requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Resolved database location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Hosted REST database
    Hosted { base_url: Url, api_key: String },
    /// SQLite database file
    SqliteFile(PathBuf),
    /// Private in-memory SQLite database
    SqliteMemory,
}

impl DatabaseConfig {
    /// Resolve the configured URL into a concrete backend target.
    ///
    /// Fails when the URL is missing, or when a hosted URL has no access key.
    pub fn target(&self) -> Result<DatabaseTarget> {
        let raw = match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => bail!(
                "database.url must be set (FINSTOCKS_DATABASE_URL or SUPABASE_URL)"
            ),
        };

        if raw.starts_with("http://") || raw.starts_with("https://") {
            let base_url =
                Url::parse(raw).with_context(|| format!("Invalid database URL: {raw}"))?;
            let api_key = match self.api_key.as_deref().map(str::trim) {
                Some(key) if !key.is_empty() => key.to_string(),
                _ => bail!(
                    "database.api_key must be set for hosted databases (FINSTOCKS_DATABASE_KEY or SUPABASE_KEY)"
                ),
            };
            return Ok(DatabaseTarget::Hosted { base_url, api_key });
        }

        if raw == "sqlite::memory:" || raw == ":memory:" {
            return Ok(DatabaseTarget::SqliteMemory);
        }

        let path = raw.strip_prefix("sqlite://").unwrap_or(raw);
        if path.is_empty() {
            bail!("database.url has an empty SQLite path");
        }
        Ok(DatabaseTarget::SqliteFile(PathBuf::from(path)))
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Windowed read-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Length of one cache window in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Capacity of the sector list cache
    #[serde(default = "default_small_capacity")]
    pub sectors_capacity: usize,

    /// Capacity of the ETF list cache
    #[serde(default = "default_small_capacity")]
    pub etfs_capacity: usize,

    /// Capacity of the ETF price history cache
    #[serde(default = "default_large_capacity")]
    pub etf_prices_capacity: usize,

    /// Capacity of the screener result cache
    #[serde(default = "default_large_capacity")]
    pub screener_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            sectors_capacity: default_small_capacity(),
            etfs_capacity: default_small_capacity(),
            etf_prices_capacity: default_large_capacity(),
            screener_capacity: default_large_capacity(),
        }
    }
}

fn default_window_secs() -> u64 {
    30
}

fn default_small_capacity() -> usize {
    10
}

fn default_large_capacity() -> usize {
    100
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Market data store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Windowed read caches
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply process environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FINSTOCKS_DATABASE_URL").or_else(|| lookup("SUPABASE_URL")) {
            self.database.url = Some(url);
        }
        if let Some(key) = lookup("FINSTOCKS_DATABASE_KEY").or_else(|| lookup("SUPABASE_KEY")) {
            self.database.api_key = Some(key);
        }

        if let Some(host) = lookup("FINSTOCKS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FINSTOCKS_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid FINSTOCKS_PORT"),
            }
        }

        if let Some(level) = lookup("FINSTOCKS_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("FINSTOCKS_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        if let Some(window) = lookup("FINSTOCKS_CACHE_WINDOW_SECS") {
            match window.parse() {
                Ok(w) => self.cache.window_secs = w,
                Err(_) => {
                    tracing::warn!(value = %window, "Ignoring invalid FINSTOCKS_CACHE_WINDOW_SECS")
                }
            }
        }
    }

    /// Check settings that would make the service unusable.
    pub fn validate(&self) -> Result<()> {
        self.database.target()?;
        if self.cache.window_secs == 0 {
            bail!("cache.window_secs must be greater than zero");
        }
        Ok(())
    }

    /// `host:port` string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
