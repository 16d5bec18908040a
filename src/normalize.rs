//! Flattening of raw Spotify "top items" pages into table rows.
//!
//! Both functions are pure. A page that does not have the expected shape is
//! rejected as a whole with [`AppError::MalformedData`] naming the problem;
//! no partial table is produced.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::AppError,
    types::{ArtistRecord, TopArtistsResponse, TopTracksResponse, TrackRecord},
};

/// One [`TrackRecord`] per item of a top tracks page, in page order.
///
/// The first album image is taken as the artwork; Spotify lists images
/// largest first.
pub fn normalize_tracks(raw: &Value) -> Result<Vec<TrackRecord>, AppError> {
    let page: TopTracksResponse = parse(raw, "top tracks")?;

    Ok(page
        .items
        .into_iter()
        .map(|item| TrackRecord {
            song: item.name,
            album: item.album.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
            id: item.id,
            popularity: item.popularity,
            img: item.album.images.into_iter().next().map(|i| i.url),
        })
        .collect())
}

/// One [`ArtistRecord`] per item of a top artists page, in page order.
pub fn normalize_artists(raw: &Value) -> Result<Vec<ArtistRecord>, AppError> {
    let page: TopArtistsResponse = parse(raw, "top artists")?;

    Ok(page
        .items
        .into_iter()
        .map(|item| ArtistRecord {
            artist: item.name,
            genres: item.genres,
            id: item.id,
            popularity: item.popularity,
            image: item.images.into_iter().next().map(|i| i.url),
        })
        .collect())
}

fn parse<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T, AppError> {
    <T as Deserialize>::deserialize(raw)
        .map_err(|e| AppError::MalformedData(format!("{what} response: {e}")))
}
