use std::time::Duration;
use thiserror::Error;
use verity_http::HttpError;

/// Why a page could not be turned into text.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch URL: invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The browser session could not be opened.
    #[error("Failed to fetch URL: {0}")]
    Session(String),

    #[error("Failed to fetch URL: {0}")]
    Navigation(String),

    #[error("Failed to fetch URL: navigation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Construction-time failures (bad selectors or endpoints in configuration).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid CSS selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("search endpoint: {0}")]
    Http(#[from] HttpError),
}
