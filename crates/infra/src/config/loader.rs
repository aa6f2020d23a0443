//! Configuration loader
//!
//! Loads application configuration from an optional file, then applies
//! environment overrides on top.
//!
//! ## Loading Strategy
//! 1. `SPENDVIEW_CONFIG` names a file explicitly, otherwise the standard
//!    locations are probed; with no file at all the defaults are used
//! 2. Environment variables override individual fields
//! 3. JSON and TOML are both supported (detected by extension)
//!
//! ## Environment Variables
//! - `RAMP_CLIENT_ID`, `RAMP_CLIENT_SECRET`: provider client credentials
//! - `RAMP_ENVIRONMENT`: `sandbox` or `production`
//! - `RAMP_BASE_URL`: provider base URL override
//! - `SPENDVIEW_PAGE_LIMIT`, `SPENDVIEW_MAX_PAGES`: pagination bounds
//! - `SPENDVIEW_FETCH_TIMEOUT_SECS`, `SPENDVIEW_FETCH_ATTEMPTS`: per-request
//!   budget and retry count
//! - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`: identity provider client
//! - `SESSION_SECRET` (or `NEXTAUTH_SECRET`), `SESSION_TTL_SECS`
//! - `ALLOWED_EMAIL_DOMAIN`: comma-separated allow-list
//! - `SPENDVIEW_BIND_ADDR`, `SPENDVIEW_PUBLIC_URL`
//! - `SPENDVIEW_CACHE_PATH`, `SPENDVIEW_CACHE_MAX_AGE_HOURS`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./spendview.toml`, `./spendview.json`
//! 2. `./config.toml`, `./config.json`
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use spendview_domain::{Config, ProviderEnvironment, Result, SpendViewError};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["spendview.toml", "spendview.json", "config.toml", "config.json"];

/// Load configuration: file (if any), then environment overrides.
///
/// # Errors
/// Returns `SpendViewError::Config` if the named or probed file cannot be
/// parsed, or if an environment variable holds an unparseable value.
pub fn load() -> Result<Config> {
    let explicit = std::env::var("SPENDVIEW_CONFIG").ok().filter(|p| !p.trim().is_empty());

    let base = match explicit {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("No config file found; using defaults");
                Config::default()
            }
        },
    };

    apply_overrides(base, |key| std::env::var(key).ok())
}

/// Defaults plus environment overrides, ignoring config files.
pub fn load_from_env() -> Result<Config> {
    apply_overrides(Config::default(), |key| std::env::var(key).ok())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `SpendViewError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SpendViewError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SpendViewError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SpendViewError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SpendViewError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SpendViewError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SpendViewError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Apply environment-style overrides from `lookup` on top of `config`.
///
/// Blank values are treated as unset.
///
/// # Errors
/// Returns `SpendViewError::Config` when a numeric or keyword variable
/// cannot be parsed.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // Provider
    if let Some(v) = get("RAMP_CLIENT_ID") {
        config.provider.client_id = Some(v);
    }
    if let Some(v) = get("RAMP_CLIENT_SECRET") {
        config.provider.client_secret = Some(v);
    }
    if let Some(v) = get("RAMP_ENVIRONMENT") {
        config.provider.environment = ProviderEnvironment::from_str(&v)
            .map_err(|e| SpendViewError::Config(format!("RAMP_ENVIRONMENT: {e}")))?;
    }
    if let Some(v) = get("RAMP_BASE_URL") {
        config.provider.base_url = Some(v);
    }
    if let Some(v) = get("SPENDVIEW_PAGE_LIMIT") {
        config.provider.page_limit = parse_number("SPENDVIEW_PAGE_LIMIT", &v)?;
    }
    if let Some(v) = get("SPENDVIEW_MAX_PAGES") {
        config.provider.max_pages = parse_number("SPENDVIEW_MAX_PAGES", &v)?;
    }
    if let Some(v) = get("SPENDVIEW_FETCH_TIMEOUT_SECS") {
        config.provider.request_timeout_secs = parse_number("SPENDVIEW_FETCH_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = get("SPENDVIEW_FETCH_ATTEMPTS") {
        config.provider.max_attempts = parse_number("SPENDVIEW_FETCH_ATTEMPTS", &v)?;
    }

    // Identity provider
    if let Some(v) = get("GOOGLE_CLIENT_ID") {
        config.identity.client_id = Some(v);
    }
    if let Some(v) = get("GOOGLE_CLIENT_SECRET") {
        config.identity.client_secret = Some(v);
    }

    // Session
    if let Some(v) = get("SESSION_SECRET").or_else(|| get("NEXTAUTH_SECRET")) {
        config.session.secret = Some(v);
    }
    if let Some(v) = get("SESSION_TTL_SECS") {
        config.session.ttl_seconds = parse_number("SESSION_TTL_SECS", &v)?;
    }
    if let Some(v) = get("ALLOWED_EMAIL_DOMAIN") {
        config.session.allowed_email_domain = v;
    }

    // Server
    if let Some(v) = get("SPENDVIEW_BIND_ADDR") {
        config.server.bind_addr = v;
    }
    if let Some(v) = get("SPENDVIEW_PUBLIC_URL") {
        config.server.public_url = Some(v.trim_end_matches('/').to_string());
    }

    // Cache
    if let Some(v) = get("SPENDVIEW_CACHE_PATH") {
        config.cache.path = Some(v);
    }
    if let Some(v) = get("SPENDVIEW_CACHE_MAX_AGE_HOURS") {
        config.cache.max_age_hours = parse_number("SPENDVIEW_CACHE_MAX_AGE_HOURS", &v)?;
    }

    Ok(config)
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| SpendViewError::Config(format!("Invalid {key}: {e}")))
}
