use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use chrono::Utc;
use serde::Deserialize;

use crate::{
    aggregate,
    chart::{self, ChartOptions},
    error::AppError,
    info, normalize,
    pages::{self, ArtistsView, TracksView},
    server::AppState,
    session::Session,
    spotify::{SpotifyApi, TOP_ITEMS_LIMIT},
    types::{AudioFeatures, Feature, FeaturePlot, Search, TimeRange},
    warning,
};

use super::found;

/// Rows shown when the request has no `num`.
pub const DEFAULT_NUM: usize = 10;

/// Number of genre words listed on the artists page.
const TOP_GENRES: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub time_range: Option<String>,
    pub search: Option<String>,
    pub num: Option<String>,
}

/// `GET /user_data` - the tracks and artists views.
///
/// # Flow
///
/// 1. The session must hold an authorization code, otherwise `401`
/// 2. Without `time_range` the browser is redirected once to the short-term
///    tracks view
/// 3. `time_range` and `num` are validated (`400` when out of range)
/// 4. An unknown `search` gets a bare link back home
/// 5. An access token is obtained, then the chosen view is fetched and rendered
pub async fn user_data<C: SpotifyApi>(
    State(state): State<AppState<C>>,
    jar: PrivateCookieJar,
    Query(params): Query<DataQuery>,
) -> Result<Response, AppError> {
    let session = Session::from_jar(&jar);
    session.require_code()?;

    let num = parse_num(params.num.as_deref())?;
    let Some(time_range) = params.time_range.as_deref() else {
        let num = params.num.is_some().then_some(num);
        return Ok(found(&default_view_url(num)));
    };
    let time_range: TimeRange = time_range.parse()?;

    match Search::parse(params.search.as_deref()) {
        Search::Tracks => {
            let (jar, access_token) = access_token(&state.spotify, jar, &session).await?;
            let page = tracks_view(&state.spotify, &access_token, time_range, num).await?;
            Ok((jar, Html(page)).into_response())
        }
        Search::Artists => {
            let (jar, access_token) = access_token(&state.spotify, jar, &session).await?;
            let page = artists_view(&state.spotify, &access_token, time_range, num).await?;
            Ok((jar, Html(page)).into_response())
        }
        Search::Unknown => Ok(Html(pages::fallback_page()).into_response()),
    }
}

/// Where a request without `time_range` is sent. Always carries a
/// `time_range`, so following it cannot redirect again. `num` is the
/// already validated value, never the raw query text.
pub fn default_view_url(num: Option<usize>) -> String {
    let mut url = format!(
        "/user_data?time_range={}&search={}",
        TimeRange::ShortTerm.as_str(),
        Search::Tracks.as_str()
    );
    if let Some(num) = num {
        url.push_str(&format!("&num={num}"));
    }
    url
}

/// Parses the `num` query parameter: a positive integer, [`DEFAULT_NUM`]
/// when absent.
pub fn parse_num(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_NUM);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "num must be a positive integer (got {raw:?})"
        ))),
    }
}

/// Returns a usable access token and the jar to send back.
///
/// A cached token is used while it is fresh. A stale one is refreshed, and
/// when that fails (or there is nothing to refresh) the stored code is
/// exchanged. A failed exchange is an [`AppError::Auth`] and ends the request
/// before any data is fetched.
async fn access_token<C: SpotifyApi>(
    spotify: &C,
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<(PrivateCookieJar, String), AppError> {
    let now = Utc::now().timestamp() as u64;
    if let Some(token) = session.valid_token(now) {
        return Ok((jar, token.access_token.clone()));
    }

    let code = session.require_code()?;
    let verifier = session.verifier.as_deref();
    let stale = session
        .token
        .as_ref()
        .filter(|t| !t.refresh_token.is_empty());

    let token = match stale {
        Some(stale) => match spotify.refresh_token(&stale.refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                warning!("Token refresh failed, exchanging the code again: {}", e);
                spotify.exchange_code_for_token(code, verifier).await?
            }
        },
        None => spotify.exchange_code_for_token(code, verifier).await?,
    };

    let jar = Session::store_token(jar, &token)?;
    Ok((jar, token.access_token))
}

async fn tracks_view<C: SpotifyApi>(
    spotify: &C,
    access_token: &str,
    time_range: TimeRange,
    num: usize,
) -> Result<String, AppError> {
    let raw = spotify
        .fetch_top_tracks(access_token, time_range, TOP_ITEMS_LIMIT)
        .await?;
    let tracks = normalize::normalize_tracks(&raw)?;

    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let features: Vec<AudioFeatures> = spotify
        .fetch_audio_features(access_token, &ids)
        .await?
        .into_iter()
        .flatten()
        .collect();
    let joined = aggregate::join_tracks_with_features(&tracks, &features);
    info!(
        "Top tracks ({}): {} fetched, {} with audio features",
        time_range,
        tracks.len(),
        joined.len()
    );

    let options = ChartOptions::default();
    let plots = Feature::HISTOGRAMS
        .iter()
        .map(|feature| {
            let column = aggregate::feature_column(&joined, *feature);
            Ok(FeaturePlot {
                feature: *feature,
                svg: chart::render_distribution(&column, &options)?,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(pages::tracks_page(&TracksView {
        rows: &joined,
        plots: &plots,
        time_range,
        num,
    }))
}

async fn artists_view<C: SpotifyApi>(
    spotify: &C,
    access_token: &str,
    time_range: TimeRange,
    num: usize,
) -> Result<String, AppError> {
    let raw = spotify
        .fetch_top_artists(access_token, time_range, TOP_ITEMS_LIMIT)
        .await?;
    let artists = normalize::normalize_artists(&raw)?;

    let counts = aggregate::count_genre_words(&artists);
    let top_genres = aggregate::top_n_genre_words(&counts, TOP_GENRES);
    info!(
        "Top artists ({}): {} fetched, {} distinct genre words",
        time_range,
        artists.len(),
        counts.len()
    );

    Ok(pages::artists_page(&ArtistsView {
        rows: &artists,
        top_genres: &top_genres,
        time_range,
        num,
    }))
}
