//! Per-request session carried in encrypted cookies.
//!
//! Nothing is kept on the server. A [`Session`] is read from the request's
//! private cookie jar at the start of a handler, and any change is written
//! back by returning the updated jar with the response.
//!
//! | cookie     | set by          | required by  |
//! |------------|-----------------|--------------|
//! | `verifier` | `POST /login`   | optional     |
//! | `code`     | `GET /?code=`   | `/user_data` |
//! | `token`    | `/user_data`    | optional     |

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

use crate::{error::AppError, types::Token};

pub const CODE_COOKIE: &str = "code";
pub const TOKEN_COOKIE: &str = "token";
pub const VERIFIER_COOKIE: &str = "verifier";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub code: Option<String>,
    pub token: Option<Token>,
    pub verifier: Option<String>,
}

impl Session {
    /// Reads the session from the jar. A token cookie that no longer parses is
    /// ignored, which sends the user through a fresh code exchange.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        Self {
            code: jar.get(CODE_COOKIE).map(|c| c.value().to_string()),
            token: jar
                .get(TOKEN_COOKIE)
                .and_then(|c| serde_json::from_str(c.value()).ok()),
            verifier: jar.get(VERIFIER_COOKIE).map(|c| c.value().to_string()),
        }
    }

    /// The authorization code, or [`AppError::Auth`] when the user never
    /// completed the login.
    pub fn require_code(&self) -> Result<&str, AppError> {
        self.code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Auth("not logged in, start again from the home page".into()))
    }

    /// The cached token if it is still usable at `now` (unix seconds).
    pub fn valid_token(&self, now: u64) -> Option<&Token> {
        self.token.as_ref().filter(|t| !t.is_expired_at(now))
    }

    /// Stores a freshly issued code. Any token from an earlier login belongs
    /// to a different grant and is dropped.
    pub fn store_code(jar: PrivateCookieJar, code: &str) -> PrivateCookieJar {
        jar.add(session_cookie(CODE_COOKIE, code.to_string()))
            .remove(Cookie::build(TOKEN_COOKIE).path("/"))
    }

    pub fn store_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, AppError> {
        let value = serde_json::to_string(token)
            .map_err(|e| AppError::Auth(format!("cannot store token: {e}")))?;
        Ok(jar.add(session_cookie(TOKEN_COOKIE, value)))
    }

    pub fn store_verifier(jar: PrivateCookieJar, verifier: &str) -> PrivateCookieJar {
        jar.add(session_cookie(VERIFIER_COOKIE, verifier.to_string()))
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
