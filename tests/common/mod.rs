#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{Value, json};
use tastegraph::{
    error::AppError,
    spotify::SpotifyApi,
    types::{AudioFeatures, TimeRange, Token},
};

// Helper function to create a raw top-tracks item
pub fn raw_track(id: &str, name: &str, popularity: u32, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "popularity": popularity,
        "album": {
            "name": format!("{name} (album)"),
            "images": [
                { "url": format!("https://img.example/{id}/640"), "height": 640, "width": 640 },
                { "url": format!("https://img.example/{id}/300"), "height": 300, "width": 300 }
            ]
        },
        "artists": artists.iter().map(|a| json!({ "name": a, "id": format!("{a}-id") })).collect::<Vec<_>>(),
        "uri": format!("spotify:track:{id}"),
        "duration_ms": 200000
    })
}

// Helper function to create a raw top-artists item
pub fn raw_artist(id: &str, name: &str, genres: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "genres": genres,
        "popularity": 70,
        "images": [{ "url": format!("https://img.example/{id}.jpg") }]
    })
}

pub fn features(id: &str, tempo: f64, loudness: f64, key: i32) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        danceability: 0.5,
        energy: 0.6,
        speechiness: 0.05,
        acousticness: 0.2,
        instrumentalness: 0.0,
        liveness: 0.1,
        valence: 0.4,
        key,
        loudness,
        tempo,
        mode: 1,
        time_signature: 4,
        uri: Some(format!("spotify:track:{id}")),
        track_href: Some(format!("https://api.spotify.com/v1/tracks/{id}")),
        analysis_url: Some(format!("https://api.spotify.com/v1/audio-analysis/{id}")),
        duration_ms: Some(200000),
    }
}

pub fn tracks_page() -> Value {
    json!({
        "items": [
            raw_track("t1", "First Song", 80, &["Alpha"]),
            raw_track("t2", "Second Song With A Very Long Title", 60, &["Beta", "Gamma"]),
            raw_track("t3", "Third Song", 40, &["Alpha"]),
        ]
    })
}

pub fn artists_page() -> Value {
    json!({
        "items": [
            raw_artist("a1", "Alpha", &["indie pop", "bedroom pop"]),
            raw_artist("a2", "Beta", &["indie rock", "pop"]),
            raw_artist("a3", "Gamma", &["shoegaze"]),
        ]
    })
}

pub fn token(access_token: &str, expires_in: u64) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: "refresh".to_string(),
        scope: "user-top-read".to_string(),
        expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

/// What a [`FakeSpotify`] answers for each call.
#[derive(Clone)]
pub struct Script {
    /// Code exchanges that succeed before every further one is rejected.
    pub exchange_limit: usize,
    pub refresh_ok: bool,
    /// Lifetime of issued tokens; 0 makes them stale on arrival.
    pub token_expires_in: u64,
    pub tracks: Result<Value, fn() -> AppError>,
    pub artists: Value,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            exchange_limit: usize::MAX,
            refresh_ok: true,
            token_expires_in: 3600,
            tracks: Ok(tracks_page()),
            artists: artists_page(),
        }
    }
}

/// In-memory stand-in for the Spotify API that records every call.
#[derive(Clone, Default)]
pub struct FakeSpotify {
    pub script: Script,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSpotify {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SpotifyApi for FakeSpotify {
    fn get_authorize_url(&self, code_challenge: &str) -> String {
        format!("https://accounts.example/authorize?code_challenge={code_challenge}")
    }

    async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<Token, AppError> {
        let earlier = self
            .calls()
            .iter()
            .filter(|c| c.starts_with("exchange"))
            .count();
        self.record(format!("exchange:{code}:{}", code_verifier.is_some()));
        if earlier < self.script.exchange_limit {
            Ok(token("access-from-code", self.script.token_expires_in))
        } else {
            Err(AppError::Auth("invalid authorization code".into()))
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, AppError> {
        self.record(format!("refresh:{refresh_token}"));
        if self.script.refresh_ok {
            Ok(token("access-from-refresh", self.script.token_expires_in))
        } else {
            Err(AppError::Auth("refresh token revoked".into()))
        }
    }

    async fn fetch_top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Value, AppError> {
        self.record(format!("top_tracks:{access_token}:{time_range}:{limit}"));
        self.script.tracks.clone().map_err(|make| make())
    }

    async fn fetch_top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Value, AppError> {
        self.record(format!("top_artists:{access_token}:{time_range}:{limit}"));
        Ok(self.script.artists.clone())
    }

    async fn fetch_audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError> {
        self.record(format!("audio_features:{access_token}:{}", track_ids.len()));
        // the last id has no features, like a local file would
        Ok(track_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                (i + 1 < track_ids.len())
                    .then(|| features(id, 100.0 + i as f64 * 10.0, -6.0 - i as f64, i as i32))
            })
            .collect())
    }
}
