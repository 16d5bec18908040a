use crate::{
    error::AppError,
    types::{AudioFeatures, AudioFeaturesResponse},
};

use super::SpotifyClient;

/// Most ids the audio-features endpoint accepts in one call.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Fetches audio features for `track_ids`, batching 100 ids per request.
///
/// The result is aligned with the input: entry `i` belongs to `track_ids[i]`,
/// and is `None` when Spotify answered `null` for that id. A failing batch
/// fails the whole call, so callers never see a partial result.
pub(super) async fn audio_features(
    client: &SpotifyClient,
    access_token: &str,
    track_ids: &[String],
) -> Result<Vec<Option<AudioFeatures>>, AppError> {
    let mut features = Vec::with_capacity(track_ids.len());

    for chunk in track_ids.chunks(MAX_IDS_PER_REQUEST) {
        let query = [("ids", chunk.join(","))];
        let raw = client
            .get_json("/audio-features", access_token, &query)
            .await?;
        let page: AudioFeaturesResponse = serde_json::from_value(raw)?;

        if page.audio_features.len() != chunk.len() {
            return Err(AppError::MalformedData(format!(
                "asked for audio features of {} tracks, got {}",
                chunk.len(),
                page.audio_features.len()
            )));
        }
        features.extend(page.audio_features);
    }

    Ok(features)
}
