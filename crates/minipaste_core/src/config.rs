//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_HIGHLIGHT_THEME, DEFAULT_PORT};
use std::env;
use std::path::PathBuf;

/// One accepted `user:password` pair for HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user: String,
    pub password: String,
}

/// Runtime configuration for minipaste.
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub base_url: String,
    pub repo: String,
    pub favicon: Option<String>,
    pub tos_maintainer: String,
    pub tos_mail: String,
    /// `max-age` for static pages; `None` emits no cache-control.
    pub cache_static_page_age: Option<u32>,
    /// `max-age` for paste reads; `None` emits no cache-control.
    pub cache_paste_age: Option<u32>,
    /// Accepted credentials. Empty disables authentication.
    pub basic_auth: Vec<Credential>,
    pub highlight_theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            repo: String::new(),
            favicon: None,
            tos_maintainer: String::new(),
            tos_mail: String::new(),
            cache_static_page_age: None,
            cache_paste_age: None,
            basic_auth: Vec::new(),
            highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("minipaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse a `user:pass,user2:pass2` credential list.
///
/// Entries without a `:` or with an empty user are skipped with a warning.
/// The password may itself contain `:`; only the first one splits.
pub fn parse_credentials(value: &str) -> Vec<Credential> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once(':') {
            Some((user, password)) if !user.is_empty() => Some(Credential {
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => {
                tracing::warn!("Ignoring malformed BASIC_AUTH entry without 'user:password'");
                None
            }
        })
        .collect()
}

/// Parse a cache age in seconds. Zero, empty, and garbage mean "no header".
fn parse_cache_age(name: &str, value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) => None,
        Ok(age) => Some(age),
        Err(_) if value.trim().is_empty() => None,
        Err(err) => {
            tracing::warn!("Invalid {}='{}': {}. Cache header disabled", name, value, err);
            None
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or(defaults.db_path),
            port,
            base_url: non_empty_var("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
            repo: env::var("REPO").unwrap_or_default(),
            favicon: non_empty_var("FAVICON"),
            tos_maintainer: env::var("TOS_MAINTAINER").unwrap_or_default(),
            tos_mail: env::var("TOS_MAIL").unwrap_or_default(),
            cache_static_page_age: env::var("CACHE_STATIC_PAGE_AGE")
                .ok()
                .and_then(|v| parse_cache_age("CACHE_STATIC_PAGE_AGE", &v)),
            cache_paste_age: env::var("CACHE_PASTE_AGE")
                .ok()
                .and_then(|v| parse_cache_age("CACHE_PASTE_AGE", &v)),
            basic_auth: env::var("BASIC_AUTH")
                .map(|v| parse_credentials(&v))
                .unwrap_or_default(),
            highlight_theme: non_empty_var("HIGHLIGHT_THEME").unwrap_or(defaults.highlight_theme),
        }
    }

    /// Whether any credential is configured.
    pub fn auth_enabled(&self) -> bool {
        !self.basic_auth.is_empty()
    }
}
