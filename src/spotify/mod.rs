//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API this application reads,
//! plus the OAuth 2.0 authorization-code exchange.
//!
//! ## Architecture
//!
//! ```text
//! Request Router (api)
//!          ↓
//! SpotifyApi trait
//!     ├── Authentication (authorize URL, code exchange, refresh)
//!     ├── Top items (tracks, artists)
//!     └── Audio features
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The router only talks to the [`SpotifyApi`] trait, so it can be driven by a
//! fake in tests. [`SpotifyClient`] is the real implementation.
//!
//! ## Error Mapping
//!
//! - Token endpoint failures of any kind become [`AppError::Auth`]
//! - A `401` from a data endpoint becomes [`AppError::Auth`]
//! - Any other error status, a timeout or a transport failure becomes
//!   [`AppError::Upstream`]
//! - A body that is not JSON becomes [`AppError::MalformedData`]
//!
//! No request is retried.
//!
//! ## API Coverage
//!
//! - `GET /me/top/tracks` - User's top tracks for a time range
//! - `GET /me/top/artists` - User's top artists for a time range
//! - `GET /audio-features` - Audio features for up to 100 tracks per call
//! - `POST /api/token` - Code exchange and token refresh

use std::{future::Future, sync::Arc};

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::{
    config::Config,
    error::AppError,
    types::{AudioFeatures, TimeRange, Token},
};

pub mod auth;
pub mod features;
pub mod top;

/// Read scopes requested during authorization.
pub const SCOPES: [&str; 3] = [
    "user-top-read",
    "user-read-recently-played",
    "user-library-read",
];

/// Number of top items requested per data view.
pub const TOP_ITEMS_LIMIT: u32 = 50;

/// Operations the request router needs from Spotify.
pub trait SpotifyApi: Clone + Send + Sync + 'static {
    /// Authorization URL the browser is sent to from `/login`.
    fn get_authorize_url(&self, code_challenge: &str) -> String;

    fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> impl Future<Output = Result<Token, AppError>> + Send;

    fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<Token, AppError>> + Send;

    fn fetch_top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> impl Future<Output = Result<Value, AppError>> + Send;

    fn fetch_top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> impl Future<Output = Result<Value, AppError>> + Send;

    /// One entry per requested id, in request order. `None` marks ids Spotify
    /// has no features for.
    fn fetch_audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> impl Future<Output = Result<Vec<Option<AudioFeatures>>, AppError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
    authorize_url: Url,
}

impl SpotifyClient {
    /// Creates a client whose requests all share the configured timeout.
    pub fn new(config: Arc<Config>) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {e}")))?;
        let authorize_url = Url::parse(&config.auth_url)
            .map_err(|e| AppError::Config(format!("invalid authorization URL: {e}")))?;

        Ok(Self {
            http,
            config,
            authorize_url,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GETs a JSON document from the Web API with a bearer token.
    async fn get_json(
        &self,
        path: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<Value, AppError> {
        let url = format!("{}{}", self.config.api_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(upstream_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Auth(format!(
                "Spotify rejected the access token for {path}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "{path} answered {status}: {body}"
            )));
        }

        let body = response.bytes().await.map_err(upstream_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn upstream_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Upstream("request to Spotify timed out".to_string())
    } else {
        AppError::Upstream(err.to_string())
    }
}

impl SpotifyApi for SpotifyClient {
    fn get_authorize_url(&self, code_challenge: &str) -> String {
        auth::authorize_url(&self.authorize_url, &self.config, code_challenge)
    }

    async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<Token, AppError> {
        auth::exchange_code(&self.http, &self.config, code, code_verifier).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, AppError> {
        auth::refresh_token(&self.http, &self.config, refresh_token).await
    }

    async fn fetch_top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Value, AppError> {
        top::top_items(self, "tracks", access_token, time_range, limit).await
    }

    async fn fetch_top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Value, AppError> {
        top::top_items(self, "artists", access_token, time_range, limit).await
    }

    async fn fetch_audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError> {
        features::audio_features(self, access_token, track_ids).await
    }
}
