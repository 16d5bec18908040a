use serde_json::Value;

use crate::{error::AppError, types::TimeRange};

use super::SpotifyClient;

/// Retrieves the user's top `kind` ("tracks" or "artists") for a time range.
///
/// Returns the raw JSON page; turning it into rows is the normalizer's job.
/// `limit` is clamped to the 1-50 window the endpoint accepts.
///
/// # Example
///
/// ```
/// let raw = top_items(&client, "tracks", &token, TimeRange::ShortTerm, 50).await?;
/// let tracks = normalize::normalize_tracks(&raw)?;
/// ```
pub(super) async fn top_items(
    client: &SpotifyClient,
    kind: &str,
    access_token: &str,
    time_range: TimeRange,
    limit: u32,
) -> Result<Value, AppError> {
    let query = [
        ("time_range", time_range.as_str().to_string()),
        ("limit", limit.clamp(1, 50).to_string()),
    ];
    client
        .get_json(&format!("/me/top/{kind}"), access_token, &query)
        .await
}
