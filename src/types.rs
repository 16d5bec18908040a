use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Seconds before the real expiry at which a token is treated as stale.
const TOKEN_EXPIRY_BUFFER: u64 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn is_expired_at(&self, now: u64) -> bool {
        now + TOKEN_EXPIRY_BUFFER >= self.obtained_at + self.expires_in
    }
}

/// Body of a successful response from the accounts token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "Last 4 weeks",
            TimeRange::MediumTerm => "Last 6 months",
            TimeRange::LongTerm => "All time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(AppError::Validation(format!(
                "time_range must be one of short_term, medium_term, long_term (got {other:?})"
            ))),
        }
    }
}

/// Which data view `/user_data` should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    Tracks,
    Artists,
    Unknown,
}

impl Search {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("tracks") => Search::Tracks,
            Some("artists") => Search::Artists,
            _ => Search::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Search::Tracks => "tracks",
            Search::Artists => "artists",
            Search::Unknown => "unknown",
        }
    }
}

/// Numeric columns of a joined track row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Popularity,
    Key,
    Loudness,
    Tempo,
    Danceability,
    Energy,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
}

impl Feature {
    /// Features drawn as histograms on the tracks page.
    pub const HISTOGRAMS: [Feature; 4] = [
        Feature::Popularity,
        Feature::Key,
        Feature::Loudness,
        Feature::Tempo,
    ];

    /// Audio-feature columns of the tracks table, in display order.
    pub const TABLE_COLUMNS: [Feature; 7] = [
        Feature::Danceability,
        Feature::Energy,
        Feature::Speechiness,
        Feature::Acousticness,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Valence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Popularity => "popularity",
            Feature::Key => "key",
            Feature::Loudness => "loudness",
            Feature::Tempo => "tempo",
            Feature::Danceability => "danceability",
            Feature::Energy => "energy",
            Feature::Speechiness => "speechiness",
            Feature::Acousticness => "acousticness",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Valence => "valence",
        }
    }
}

// Raw Spotify payloads. Only the fields this app reads are declared.

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<RawTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    pub id: String,
    pub name: String,
    pub popularity: u32,
    pub album: RawAlbum,
    pub artists: Vec<RawArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopArtistsResponse {
    pub items: Vec<RawArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub key: i32,
    pub loudness: f64,
    pub tempo: f64,
    #[serde(default)]
    pub mode: i32,
    #[serde(default)]
    pub time_signature: i32,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub track_href: Option<String>,
    #[serde(default)]
    pub analysis_url: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

// Normalized rows.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    pub song: String,
    pub album: String,
    pub artists: Vec<String>,
    pub id: String,
    pub popularity: u32,
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRecord {
    pub artist: String,
    pub genres: Vec<String>,
    pub id: String,
    pub popularity: u32,
    pub image: Option<String>,
}

/// A track row joined with its audio features. Transport-only columns
/// (uri, track link, analysis link, duration) are not carried over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedTrack {
    pub song: String,
    pub album: String,
    pub artists: Vec<String>,
    pub id: String,
    pub popularity: u32,
    pub img: Option<String>,
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub key: i32,
    pub loudness: f64,
    pub tempo: f64,
    pub mode: i32,
    pub time_signature: i32,
}

impl JoinedTrack {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Popularity => f64::from(self.popularity),
            Feature::Key => f64::from(self.key),
            Feature::Loudness => self.loudness,
            Feature::Tempo => self.tempo,
            Feature::Danceability => self.danceability,
            Feature::Energy => self.energy,
            Feature::Speechiness => self.speechiness,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Valence => self.valence,
        }
    }
}

/// Histogram markup for one feature, ready to embed in a page.
#[derive(Debug, Clone)]
pub struct FeaturePlot {
    pub feature: Feature,
    pub svg: String,
}
