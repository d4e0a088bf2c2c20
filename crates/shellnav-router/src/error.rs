//! Router error types

use thiserror::Error;

/// Failure while retrieving a page body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Fetch failed: {0}")]
    Fetch(FetchError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A visual effect hook failed. Effects are cosmetic, so this never aborts a navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Effect '{effect}' failed: {reason}")]
pub struct EffectError {
    pub effect: String,
    pub reason: String,
}

impl EffectError {
    pub fn new(effect: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            effect: effect.into(),
            reason: reason.into(),
        }
    }
}
