//! Configuration management for gphotos-manifest.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory, and fall back to built-in defaults.
//! [`Settings`] gathers them once at start-up; command-line flags override
//! individual fields afterwards.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::utils;

pub const APP_DIR: &str = "gphotos-manifest";
pub const DEFAULT_CREDENTIALS_PATH: &str = "~/.config/gphotos-manifest/client_secret.json";
pub const DEFAULT_MANIFEST_PATH: &str = "manifest.json";
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:8080/auth/google/callback";
pub const DEFAULT_PHOTOS_API_URL: &str = "https://photoslibrary.googleapis.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const PHOTOS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_PAGES: usize = 100_000;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at `<local data dir>/gphotos-manifest/.env`:
/// - Linux: `~/.local/share/gphotos-manifest/.env`
/// - macOS: `~/Library/Application Support/gphotos-manifest/.env`
/// - Windows: `%LOCALAPPDATA%/gphotos-manifest/.env`
///
/// A missing file is not an error. Variables already present in the process
/// environment win over the file.
///
/// # Errors
///
/// Returns an error string if the file exists but cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let path = app_data_dir().join(".env");
    if !async_fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn app_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed_var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Path of the OAuth client secret file, `GPHOTOS_CREDENTIALS_PATH`.
///
/// May start with `~`, which is expanded when the file is loaded.
pub fn credentials_path() -> String {
    var_or("GPHOTOS_CREDENTIALS_PATH", DEFAULT_CREDENTIALS_PATH)
}

/// Path of the token cache, `GPHOTOS_TOKEN_PATH`.
///
/// Defaults to `<local data dir>/gphotos-manifest/cache/token.json`.
pub fn token_path() -> PathBuf {
    match env::var("GPHOTOS_TOKEN_PATH") {
        Ok(p) if !p.trim().is_empty() => utils::expand_home(&p),
        _ => app_data_dir().join("cache").join("token.json"),
    }
}

/// Path of the manifest output, `GPHOTOS_MANIFEST_PATH`.
pub fn manifest_path() -> PathBuf {
    utils::expand_home(&var_or("GPHOTOS_MANIFEST_PATH", DEFAULT_MANIFEST_PATH))
}

/// Redirect URI the local listener serves, `GPHOTOS_CALLBACK_URL`.
///
/// This must match a redirect URI registered for the OAuth client.
pub fn callback_url() -> String {
    var_or("GPHOTOS_CALLBACK_URL", DEFAULT_CALLBACK_URL)
}

/// Base URL of the Photos Library API, `GPHOTOS_API_URL`.
pub fn photos_api_url() -> String {
    var_or("GPHOTOS_API_URL", DEFAULT_PHOTOS_API_URL)
}

/// OAuth scope requested during consent, `GPHOTOS_SCOPE`.
pub fn scope() -> String {
    var_or("GPHOTOS_SCOPE", PHOTOS_READONLY_SCOPE)
}

/// Seconds to wait for the OAuth redirect, `GPHOTOS_AUTH_TIMEOUT_SECS`.
pub fn auth_timeout_secs() -> u64 {
    parsed_var_or("GPHOTOS_AUTH_TIMEOUT_SECS", DEFAULT_AUTH_TIMEOUT_SECS)
}

/// Listing page ceiling, `GPHOTOS_MAX_PAGES`.
pub fn max_pages() -> usize {
    parsed_var_or("GPHOTOS_MAX_PAGES", DEFAULT_MAX_PAGES)
}

/// Immutable run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials_path: String,
    pub token_path: PathBuf,
    pub manifest_path: PathBuf,
    pub callback_url: String,
    pub photos_api_url: String,
    pub scope: String,
    /// `None` waits for the callback indefinitely.
    pub auth_timeout: Option<Duration>,
    pub max_pages: usize,
    pub open_browser: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            credentials_path: credentials_path(),
            token_path: token_path(),
            manifest_path: manifest_path(),
            callback_url: callback_url(),
            photos_api_url: photos_api_url(),
            scope: scope(),
            auth_timeout: timeout_from_secs(auth_timeout_secs()),
            max_pages: max_pages(),
            open_browser: true,
        }
    }
}

/// `0` disables the timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
