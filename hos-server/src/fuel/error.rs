//! Fuel station search error types.

/// Errors from a station search collaborator.
///
/// The locator never propagates these: a failed lookup is logged and
/// treated as "no stations in this area".
#[derive(Debug, thiserror::Error)]
pub enum FuelSearchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by station search API")]
    RateLimited,

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A local station directory could not be loaded
    #[error("station directory error: {message}")]
    Directory { message: String },
}
