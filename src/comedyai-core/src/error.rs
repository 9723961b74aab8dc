//! Error types for the comedy contest.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContestError {
    #[error("OpenAI API error: {0}")]
    OpenAIError(#[from] async_openai::error::OpenAIError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{service} API returned {status}: {body}")]
    ApiError {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No theme available: every candidate was rejected and no theme has been used yet")]
    NoThemeAvailable,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to open viewer: {0}")]
    ViewerError(String),
}
