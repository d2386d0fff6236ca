//! Error types for the tweeter service.
//!
//! Collaborator calls return these errors explicitly; the content strategies
//! decide which of them are recoverable (logged and retried or degraded) and
//! which abort the composition of a status.

use std::io;
use thiserror::Error;

/// Primary error type for the tweeter crate
#[derive(Error, Debug)]
pub enum TweeterError {
    /// A word, image-search or fortune collaborator could not produce a result.
    #[error("{source_name} unavailable: {message}")]
    SourceUnavailable {
        source_name: &'static str,
        message: String,
    },

    /// A single image download attempt failed.
    #[error("Failed to download {url}: {message}")]
    DownloadFailure { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Twitter API error for operation '{operation}' ({status})")]
    TwitterApi { operation: String, status: u16 },

    #[error("Tweet is too long: {0} characters (max 280)")]
    TweetTooLong(usize),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

impl TweeterError {
    pub(crate) fn unavailable(source_name: &'static str, message: impl Into<String>) -> Self {
        TweeterError::SourceUnavailable {
            source_name,
            message: message.into(),
        }
    }

    pub(crate) fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        TweeterError::DownloadFailure {
            url: url.into(),
            message: message.into(),
        }
    }
}

// Re-export error types for convenience
pub use TweeterError as Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
