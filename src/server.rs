use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tokio::net::TcpListener;

use crate::{
    Res, api,
    config::Config,
    error::AppError,
    info,
    spotify::{SpotifyApi, SpotifyClient},
};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState<C> {
    pub spotify: C,
    /// Encrypts the session cookies. Generated at start-up, so sessions do not
    /// survive a restart.
    pub key: Key,
}

impl<C> AppState<C> {
    pub fn new(spotify: C) -> Self {
        Self {
            spotify,
            key: Key::generate(),
        }
    }
}

impl<C> FromRef<AppState<C>> for Key {
    fn from_ref(state: &AppState<C>) -> Self {
        state.key.clone()
    }
}

pub fn router<C: SpotifyApi>(state: AppState<C>) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/login", post(api::login::<C>))
        .route("/user_data", get(api::user_data::<C>))
        .route("/health", get(api::health))
        .with_state(state)
}

/// Serves `router` on an already bound listener until the process stops.
pub async fn serve<C: SpotifyApi>(listener: TcpListener, state: AppState<C>) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds the address the server will listen on.
pub async fn bind(addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| AppError::Config(format!("invalid server address {addr}: {e}")))?;
    Ok(TcpListener::bind(&addr).await?)
}

/// Serves the application with the real Spotify client on `listener`.
///
/// # Errors
///
/// Fails when the HTTP client cannot be built or serving stops with an I/O
/// error.
pub async fn start_server(listener: TcpListener, config: Config) -> Res<()> {
    let spotify = SpotifyClient::new(Arc::new(config))?;

    info!("Listening on http://{}", listener.local_addr()?);
    info!("Spotify redirect URI: {}", spotify.config().redirect_uri);

    serve(listener, AppState::new(spotify)).await
}
