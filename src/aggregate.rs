use std::collections::HashMap;

use crate::types::{ArtistRecord, AudioFeatures, Feature, JoinedTrack, TrackRecord};

/// Inner-joins tracks with their audio features on the track id.
///
/// Output follows track order. Tracks without features and features without
/// a track are dropped, so the result can be shorter than either input.
/// Only the first feature vector seen for an id is used.
pub fn join_tracks_with_features(
    tracks: &[TrackRecord],
    features: &[AudioFeatures],
) -> Vec<JoinedTrack> {
    let mut by_id: HashMap<&str, &AudioFeatures> = HashMap::with_capacity(features.len());
    for f in features {
        by_id.entry(f.id.as_str()).or_insert(f);
    }

    let mut joined = Vec::with_capacity(tracks.len().min(features.len()));
    for track in tracks {
        // an id can only be consumed once
        let Some(f) = by_id.remove(track.id.as_str()) else {
            continue;
        };
        joined.push(JoinedTrack {
            song: track.song.clone(),
            album: track.album.clone(),
            artists: track.artists.clone(),
            id: track.id.clone(),
            popularity: track.popularity,
            img: track.img.clone(),
            danceability: f.danceability,
            energy: f.energy,
            speechiness: f.speechiness,
            acousticness: f.acousticness,
            instrumentalness: f.instrumentalness,
            liveness: f.liveness,
            valence: f.valence,
            key: f.key,
            loudness: f.loudness,
            tempo: f.tempo,
            mode: f.mode,
            time_signature: f.time_signature,
        });
    }
    joined
}

pub fn feature_column(rows: &[JoinedTrack], feature: Feature) -> Vec<f64> {
    rows.iter().map(|row| row.value(feature)).collect()
}

/// Counts every whitespace-separated word of every genre tag.
///
/// "indie pop" and "k-pop" count as `indie`, `pop` and `k-pop`. Matching is
/// case-sensitive.
pub fn count_genre_words(artists: &[ArtistRecord]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in artists
        .iter()
        .flat_map(|a| a.genres.iter())
        .flat_map(|genre| genre.split_whitespace())
    {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

/// The `n` most frequent genre words, most frequent first.
///
/// Equal counts are ordered by word so the ranking is stable across requests.
pub fn top_n_genre_words(counts: &HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}
