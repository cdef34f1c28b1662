//! Shared configuration for printfleet hosts.
//!
//! TOML profiles, API-key resolution (env + plaintext), logging setup,
//! and translation to `printfleet_core::FleetConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use printfleet_core::FleetConfig;

/// Env var consulted when a profile names no key variable of its own.
pub const API_KEY_ENV: &str = "PRINTFLEET_API_KEY";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install log subscriber: {0}")]
    Tracing(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name. Optional when only one profile exists.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named print server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub recursive_listing: bool,

    #[serde(default)]
    pub log: LogSettings,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            recursive_listing: false,
            log: LogSettings::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `"info"` or `"printfleet_core=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A named print server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Print server base URL (e.g., "http://printfarm.local:4000").
    pub server: String,

    /// API key (plaintext, prefer an env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override the default recursive file listing flag.
    pub recursive_listing: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "printfleet", "printfleet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("printfleet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Env vars use the `PRINTFLEET_` prefix with `__` between levels, e.g.
/// `PRINTFLEET_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("PRINTFLEET_")
                .ignore(&["api_key"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the profile to use: `requested`, else `default_profile`, else
/// the only profile when there is exactly one.
pub fn active_profile<'a>(
    cfg: &'a Config,
    requested: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = match requested.or(cfg.default_profile.as_deref()) {
        Some(name) => name,
        None if cfg.profiles.len() == 1 => cfg
            .profiles
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or_default(),
        None => {
            return Err(ConfigError::Validation {
                field: "default_profile".into(),
                reason: "no profile requested and no default set".into(),
            });
        }
    };

    cfg.profiles
        .get_key_value(name)
        .map(|(name, profile)| (name.as_str(), profile))
        .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
}

/// Resolve an API key from the credential chain.
///
/// A print server without authentication is valid, so an empty chain
/// yields `None` rather than an error.
pub fn resolve_api_key(profile: &Profile) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(API_KEY_ENV) {
        return Some(SecretString::from(val));
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Build a `FleetConfig` for the named profile, applying global defaults
/// where the profile leaves a field unset.
pub fn profile_to_fleet_config(
    cfg: &Config,
    profile_name: &str,
) -> Result<FleetConfig, ConfigError> {
    let profile = cfg
        .profiles
        .get(profile_name)
        .ok_or_else(|| ConfigError::ProfileNotFound {
            name: profile_name.into(),
        })?;

    let server: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let timeout_secs = profile.timeout.unwrap_or(cfg.defaults.timeout);
    if timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let mut fleet = FleetConfig::new(server);
    fleet.api_key = resolve_api_key(profile);
    fleet.timeout = Duration::from_secs(timeout_secs);
    fleet.recursive_file_listing = profile
        .recursive_listing
        .unwrap_or(cfg.defaults.recursive_listing);
    Ok(fleet)
}

// ── Logging ─────────────────────────────────────────────────────────

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(settings: &LogSettings) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| ConfigError::Validation {
            field: "log.level".into(),
            reason: e.to_string(),
        })?,
    };

    let installed = match settings.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    };
    installed.map_err(|e| ConfigError::Tracing(e.to_string()))
}
