//! Tastegraph Library
//!
//! This library implements a small web application that signs a user in with
//! Spotify, fetches their top tracks or top artists and renders the results as
//! tables and histograms. It includes modules for the HTTP surface, the Spotify
//! Web API client, record normalization, aggregation and chart rendering.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the landing page, login and data views
//! - `aggregate` - Joins tracks with audio features and ranks genre words
//! - `chart` - Histogram rendering to inline SVG
//! - `config` - Configuration loaded once from the environment
//! - `error` - Error taxonomy and its mapping onto HTTP responses
//! - `normalize` - Raw Spotify JSON into flat track and artist rows
//! - `pages` - HTML page builders
//! - `server` - Router construction and the serving loop
//! - `session` - Per-request session stored in encrypted cookies
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tastegraph::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> tastegraph::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let listener = server::bind(&config.server_addr).await?;
//!     server::start_server(listener, config).await?;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pages;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the edges of the application (start-up, the binary entry point)
/// where any error is reported and ends the process. Request handling uses
/// [`error::AppError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Local wall-clock time prefixed to every log line.
#[doc(hidden)]
pub fn log_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Logs an informational message with a blue bullet point.
///
/// Writes one line to stdout: the local time, a blue "o" and the message.
/// Used for routine server events such as start-up and per-request summaries.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Listening on http://{}", addr);
/// info!("Top tracks ({}): {} fetched", time_range, count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("{} [{}] {}", $crate::log_time().dimmed(), "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Logs a success message with a green checkmark.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Configuration loaded");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("{} [{}] {}", $crate::log_time().dimmed(), "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Logs an error with a red exclamation mark and exits the program.
///
/// Writes to stderr and terminates the process with exit code 1.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// Only used during start-up, where a missing secret or an unusable address
/// means the server must not come up at all. Request handlers never call it;
/// they return an [`error::AppError`] instead.
///
/// # Example
///
/// ```
/// error!("{} must be set", CLIENT_ID_VAR);
/// error!("Cannot listen on {}. Err: {}", addr, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("{} [{}] {}", $crate::log_time().dimmed(), "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Logs a warning with a yellow exclamation mark.
///
/// Writes to stderr and keeps running. Every failed request is reported
/// through this macro before it is turned into an error page, as is a token
/// refresh that falls back to a new code exchange.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("{} ({})", err, status);
/// warning!("Token refresh failed, exchanging the code again: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("{} [{}] {}", $crate::log_time().dimmed(), "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
