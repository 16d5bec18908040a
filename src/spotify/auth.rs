use chrono::Utc;
use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    config::Config,
    error::AppError,
    types::{Token, TokenResponse},
    utils,
};

use super::SCOPES;

/// Builds the Spotify authorization URL.
///
/// The URL carries the client id, the pre-registered redirect URI, the read
/// scopes and a PKCE challenge derived from a verifier the caller keeps in the
/// user's session. `show_dialog=true` makes Spotify ask for consent every
/// time, so switching accounts is possible.
///
/// # Example
///
/// ```
/// let url = authorize_url(&base, &config, &utils::generate_code_challenge(&verifier));
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(base: &Url, config: &Config, code_challenge: &str) -> String {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("show_dialog", "true")
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", code_challenge);
    url.into()
}

/// Exchanges an authorization code for an access token.
///
/// Authenticates with the client id and secret (HTTP Basic) and, when the
/// login started with a PKCE challenge, also sends the matching verifier.
///
/// # Errors
///
/// Every failure is reported as [`AppError::Auth`]: an invalid or expired
/// code, a verifier mismatch, a network failure or a response that carries no
/// access token. The user has to log in again in all of those cases.
pub async fn exchange_code(
    http: &Client,
    config: &Config,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<Token, AppError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];
    if let Some(verifier) = code_verifier {
        form.push(("code_verifier", verifier));
    }

    let response = request_token(http, config, &form).await?;
    let refresh_token = response.refresh_token.clone().unwrap_or_default();
    Ok(into_token(response, refresh_token))
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when the response omits
/// one, the token passed in stays valid and is kept.
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<Token, AppError> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let response = request_token(http, config, &form).await?;
    let refresh_token = response
        .refresh_token
        .clone()
        .unwrap_or_else(|| refresh_token.to_string());
    Ok(into_token(response, refresh_token))
}

async fn request_token(
    http: &Client,
    config: &Config,
    form: &[(&str, &str)],
) -> Result<TokenResponse, AppError> {
    let res = http
        .post(&config.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth(&config.client_id, &config.client_secret),
        )
        .form(form)
        .send()
        .await
        .map_err(|e| AppError::Auth(format!("token request failed: {e}")))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AppError::Auth(format!(
            "token endpoint answered {status}: {body}"
        )));
    }

    res.json::<TokenResponse>()
        .await
        .map_err(|e| AppError::Auth(format!("token response unreadable: {e}")))
}

fn into_token(response: TokenResponse, refresh_token: String) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token,
        scope: response.scope,
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
