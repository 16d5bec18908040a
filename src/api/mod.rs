//! # API Module
//!
//! HTTP handlers for Tastegraph. Three logical pages sit behind four routes:
//!
//! - [`home`] - `GET /`, the landing page and the OAuth redirect target
//! - [`login`] - `POST /login`, redirect to Spotify's authorization page
//! - [`user_data`] - `GET /user_data`, top tracks or top artists
//! - [`health`] - `GET /health`, status and version for monitoring
//!
//! Handlers get the Spotify client from the router state and the user's
//! [`Session`](crate::session::Session) from the private cookie jar. Failures
//! are returned as [`AppError`](crate::error::AppError), which renders an
//! error page with the matching status code.

use axum::{
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

mod health;
mod home;
mod user_data;

pub use health::health;
pub use home::{CallbackQuery, home, login};
pub use user_data::{DEFAULT_NUM, DataQuery, default_view_url, parse_num, user_data};

/// A `302 Found` redirect to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
