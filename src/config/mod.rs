/// Configuration for the optiview console.
///
/// Layered resolution, later layers override earlier ones:
///
/// 1. **Built-in defaults** — [`ServiceConfig::default`]
/// 2. **User global config** — `~/.optiview/config.toml`, `[service]` table
/// 3. **Environment variables** — `OPTIVIEW_*` (highest precedence)
///
/// Malformed or missing config files are silently ignored: the console must
/// stay usable with defaults alone.
///
/// Supported environment variables:
///
/// - `OPTIVIEW_URL` — service base URL
/// - `OPTIVIEW_TIMEOUT_MS` — per-request timeout in milliseconds
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default service base URL when nothing is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Resolved connection settings for the optimizer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL the five endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds, applied by the transport.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// On-disk layout of `~/.optiview/config.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: Option<ServiceConfig>,
}

/// Load the fully resolved configuration: defaults → global TOML → env.
pub fn load() -> ServiceConfig {
    let mut config = ServiceConfig::default();

    if let Some(file_config) = load_toml_file(global_config_path()) {
        config = file_config;
    }

    apply_env_overrides(&mut config);
    config
}

/// Path to the user global config: `~/.optiview/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".optiview").join("config.toml"))
}

/// Read the `[service]` table from a TOML file, if the file exists and
/// parses. Malformed files are ignored.
fn load_toml_file(path: Option<PathBuf>) -> Option<ServiceConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let parsed: ConfigFile = toml::from_str(&content).ok()?;
    parsed.service
}

/// Apply `OPTIVIEW_*` environment overrides (highest precedence layer).
fn apply_env_overrides(config: &mut ServiceConfig) {
    if let Ok(val) = std::env::var("OPTIVIEW_URL")
        && !val.is_empty()
    {
        config.base_url = val;
    }
    if let Ok(val) = std::env::var("OPTIVIEW_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.timeout_ms = ms;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
