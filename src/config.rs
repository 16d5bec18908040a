//! Configuration management for Tastegraph.
//!
//! Configuration is read once at start-up into a [`Config`] value which is
//! then handed to the router and the Spotify client. Nothing reads the
//! environment after that point.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then `.env` in the working directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::AppError;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_API_REDIRECT_URI";
pub const SERVER_ADDRESS_VAR: &str = "SERVER_ADDRESS";
pub const AUTH_URL_VAR: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL_VAR: &str = "SPOTIFY_API_TOKEN_URL";
pub const API_URL_VAR: &str = "SPOTIFY_API_URL";
pub const HTTP_TIMEOUT_VAR: &str = "SPOTIFY_HTTP_TIMEOUT_SECS";

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the platform-specific local data directory under
/// `tastegraph/.env` first, then for a `.env` in the current working directory.
/// Missing files are not an error; variables already present in the process
/// environment are never overridden.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tastegraph/.env`
/// - macOS: `~/Library/Application Support/tastegraph/.env`
/// - Windows: `%LOCALAPPDATA%/tastegraph/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tastegraph/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }
    Ok(())
}

/// Process-wide settings, read-only after start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Pre-registered callback; Spotify sends the user back here with `?code=`.
    pub redirect_uri: String,
    pub server_addr: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails with [`AppError::Config`] when the client id or the client secret
    /// is missing or empty, or when the timeout is not a positive whole number
    /// of seconds.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AppError::Config(format!(
                        "{HTTP_TIMEOUT_VAR} must be a positive number of seconds"
                    )));
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            client_id: required(CLIENT_ID_VAR)?,
            client_secret: required(CLIENT_SECRET_VAR)?,
            redirect_uri: optional(REDIRECT_URI_VAR, DEFAULT_REDIRECT_URI),
            server_addr: optional(SERVER_ADDRESS_VAR, DEFAULT_SERVER_ADDRESS),
            auth_url: optional(AUTH_URL_VAR, DEFAULT_AUTH_URL),
            token_url: optional(TOKEN_URL_VAR, DEFAULT_TOKEN_URL),
            api_url: optional(API_URL_VAR, DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}
