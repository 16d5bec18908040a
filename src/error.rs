use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::{pages, warning};

#[derive(Debug, Error)]
pub enum AppError {
    /// Authorization code missing, invalid or expired.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// Spotify could not be reached, timed out or answered with an error status.
    #[error("Spotify API error: {0}")]
    Upstream(String),

    /// A Spotify response did not have the expected shape.
    #[error("Unexpected response from Spotify: {0}")]
    MalformedData(String),

    /// A query parameter is outside its accepted set.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// plotters failed to draw a histogram.
    #[error("Failed to render chart: {0}")]
    Chart(String),

    /// Missing or unusable settings. Only raised at start-up.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedData(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Chart(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedData(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        warning!("{} ({})", self, status);
        (status, Html(pages::error_page(status, &self.to_string()))).into_response()
    }
}
