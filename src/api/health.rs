use axum::response::Json;
use serde_json::{Value, json};

/// `GET /health` - liveness probe. Touches neither the session nor Spotify.
pub async fn health() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
