//! # Configuration
//!
//! Settings follow a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! The config file is the one the running instance already reads
//! (`$HUTT_CONFIG`, `$XDG_CONFIG_HOME/hutt/config.toml`, or
//! `~/.config/hutt/config.toml`). Only the `[url_handler]` table belongs to
//! us; every other key is ignored. The file is never created or written here.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HuttConfig {
    #[serde(default)]
    pub url_handler: UrlHandlerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UrlHandlerConfig {
    /// Socket probed before `$XDG_RUNTIME_DIR/hutt.sock` and the per-user fallback.
    pub socket: Option<PathBuf>,
    pub connect_timeout_ms: Option<u64>,
    pub notify: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_NOTIFY: bool = true;

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub socket: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub notify: bool,
}

/// Settings that came in on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub socket: Option<PathBuf>,
    pub no_notify: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Ordered list of places the config file may live.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(p) = std::env::var("HUTT_CONFIG") {
        paths.push(PathBuf::from(p));
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("hutt").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("hutt").join("config.toml"));
    }

    paths
}

/// Load config from the first candidate path that exists.
///
/// No file at all is not an error: returns `HuttConfig::default()`.
pub fn load_config() -> Result<HuttConfig, ConfigError> {
    match candidate_paths().into_iter().find(|p| p.is_file()) {
        Some(path) => load_config_from(&path),
        None => {
            debug!("No config file found, using defaults");
            Ok(HuttConfig::default())
        }
    }
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<HuttConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HuttConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HuttConfig, cli: &CliOverrides) -> ResolvedConfig {
    let section = &config.url_handler;

    // Socket: CLI → env → config → none (probe the standard list only)
    let socket = cli
        .socket
        .clone()
        .or_else(|| {
            std::env::var_os("HUTT_SOCKET")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| section.socket.clone());

    let notify = !cli.no_notify && section.notify.unwrap_or(DEFAULT_NOTIFY);

    ResolvedConfig {
        socket,
        connect_timeout: Duration::from_millis(
            section
                .connect_timeout_ms
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        ),
        notify,
    }
}
