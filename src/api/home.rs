use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    error::AppError, pages, server::AppState, session::Session, spotify::SpotifyApi, utils,
};

use super::found;

/// Query Spotify appends when it sends the user back to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// `GET /` - landing page, and the OAuth redirect target.
///
/// With a `code` the code is stored in the session and the browser moves on
/// to `/user_data`; without one the landing page is rendered.
pub async fn home(
    jar: PrivateCookieJar,
    Query(params): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    if let Some(reason) = params.error {
        return Err(AppError::Auth(format!("Spotify login was not completed: {reason}")));
    }

    match params.code.filter(|c| !c.is_empty()) {
        Some(code) => {
            let jar = Session::store_code(jar, &code);
            Ok((jar, found("/user_data")).into_response())
        }
        None => Ok(Html(pages::landing_page()).into_response()),
    }
}

/// `POST /login` - sends the browser to Spotify's consent screen.
///
/// A fresh PKCE verifier is kept in the session; only its challenge leaves
/// the server.
pub async fn login<C: SpotifyApi>(
    State(state): State<AppState<C>>,
    jar: PrivateCookieJar,
) -> Response {
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);
    let url = state.spotify.get_authorize_url(&challenge);

    let jar = Session::store_verifier(jar, &verifier);
    (jar, found(&url)).into_response()
}
