//! # Tweeter Library
//!
//! A Twitter/X bot library that composes tweetable statuses and posts them.
//! Two content strategies are available:
//!
//! - **random-words-image**: random dictionary words (optionally led by the word
//!   of the day) with a related image found through an image search. Searches
//!   and downloads are retried a bounded number of times; when no search result
//!   turns up, a configured fallback image is attached instead.
//! - **fortune**: the output of the `fortune` program, text only.
//!
//! ## Configuration
//!
//! See [`AppConfig::from_env`]. The most important variables:
//! - `STRATEGY`: `random-words-image` (default) or `fortune`
//! - `NUM_WORDS`, `RANDOM_WORDS_COUNT`, `USE_WORD_OF_THE_DAY`, `NO_RESULTS_IMAGE`
//! - `WORDNIK_API_KEY`, `IMAGE_SEARCH_API_KEY`, `IMAGE_SEARCH_ENGINE_ID`
//! - `xapi_access_token`: OAuth 2.0 User Context token (not needed with `DRY_RUN`)
//! - `TWEET_SCHEDULE`, `RUN_ONCE`, `PORT`
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a welcome message
//! - `GET /health`: Returns service health status
//! - `GET /preview`: Composes a status without posting it
//! - `POST /tweet`: Composes a status and posts it

pub mod app;
pub mod config;
pub mod content;
pub mod cronjob;
pub mod error;
pub mod handlers;
pub mod sources;
pub mod twitter;

// Re-export commonly used types and functions
pub use app::AppState;
pub use config::{get_server_port, AppConfig, ContentSettings, StrategyKind, TwitterConfig};
pub use content::{
    ContentFetchStrategy, FetchedImage, FortuneStrategy, RandomWordsImageConfig,
    RandomWordsImageStrategy, TweetableStatus,
};
pub use cronjob::start_post_cronjob;
pub use error::{Error, Result, TweeterError};
pub use handlers::router;
pub use twitter::{DryRunPublisher, StatusPublisher, TwitterClient};

#[cfg(test)]
mod tests;
