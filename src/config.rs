//! Configuration module for the tweeter service.
//!
//! This module contains configuration structures and environment variable handling
//! for the content strategies, their collaborators and the Twitter/X API integration.

use log::{debug, error, info, warn};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default cron expression for scheduled posting: every four hours, on the hour.
pub const DEFAULT_TWEET_SCHEDULE: &str = "0 0 0/4 * * * *";

/// Default base URL of the Wordnik v4 API.
pub const DEFAULT_WORDNIK_BASE_URL: &str = "https://api.wordnik.com/v4";

/// Masks a secret for logging, keeping at most the first and last eight characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let length = secret.chars().count();
    let prefix: String = secret.chars().take(8).collect();
    if length > 16 {
        let suffix: String = secret.chars().skip(length - 8).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

/// Which content strategy the service composes statuses with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Random dictionary words with a related image attached.
    #[default]
    RandomWordsImage,
    /// A single fortune, text only.
    Fortune,
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "random-words-image" | "random_words_image" | "words" => Ok(StrategyKind::RandomWordsImage),
            "fortune" => Ok(StrategyKind::Fortune),
            other => Err(Error::Config(format!("Unknown STRATEGY '{}'", other))),
        }
    }
}

/// Read-only settings the content strategies consult while composing a status.
///
/// Each value is optional here; a strategy that needs a missing value fails the
/// invocation with a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSettings {
    /// Default number of words when a strategy is configured with zero (`num-words`).
    pub num_words: Option<usize>,
    /// Local image attached when no search result can be found (`no-results-image`).
    pub no_results_image: Option<PathBuf>,
}

impl ContentSettings {
    /// Returns the configured default word count.
    pub fn default_num_words(&self) -> Result<usize> {
        self.num_words
            .ok_or_else(|| Error::Config("num-words is not configured".to_string()))
    }

    /// Returns the configured fallback image path.
    pub fn no_results_image(&self) -> Result<&Path> {
        self.no_results_image
            .as_deref()
            .ok_or_else(|| Error::Config("no-results-image is not configured".to_string()))
    }
}

/// Configuration struct for Twitter/X API credentials.
///
/// Holds the OAuth 2.0 User Context access token used for media upload and
/// posting tweets through the v2 endpoints.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The Access Token for OAuth 2.0 User Context authentication
    pub access_token: String,
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` by loading `xapi_access_token` from the environment.
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If the token is present and not empty
    /// - `Err(Error::Config)`: If the token is missing or empty
    pub fn from_env() -> Result<Self> {
        info!("Loading Twitter configuration from environment variables");

        let access_token = match env::var("xapi_access_token") {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to load xapi_access_token from environment: {}", e);
                return Err(Error::Config(format!(
                    "Missing xapi_access_token environment variable: {}",
                    e
                )));
            }
        };

        info!(
            "Found xapi_access_token environment variable with length: {}",
            access_token.len()
        );
        debug!("Access token (masked): {}", mask_secret(&access_token));

        if access_token.is_empty() {
            error!("Access token is empty");
            return Err(Error::Config("Access token cannot be empty".to_string()));
        }
        if access_token.len() < 10 {
            warn!(
                "Access token seems unusually short ({} characters)",
                access_token.len()
            );
        }

        Ok(TwitterConfig { access_token })
    }
}

/// Complete service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub strategy: StrategyKind,
    /// Word count for the random-words strategy; zero defers to `content.num_words`.
    pub random_words_count: usize,
    pub use_word_of_the_day: bool,
    pub content: ContentSettings,
    pub wordnik_api_key: Option<String>,
    pub wordnik_base_url: String,
    pub image_search_api_key: Option<String>,
    pub image_search_engine_id: Option<String>,
    pub download_dir: PathBuf,
    /// Program and arguments used to produce fortunes.
    pub fortune_command: Vec<String>,
    pub tweet_schedule: String,
    pub run_once: bool,
    pub dry_run: bool,
    pub port: u16,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match optional_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid {}: '{}'", name, value))),
        None => Ok(default),
    }
}

fn parse_flag(name: &str) -> Result<bool> {
    match optional_var(name) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!("Invalid {}: '{}'", name, value))),
        },
        None => Ok(false),
    }
}

impl AppConfig {
    /// Loads the service configuration from environment variables.
    ///
    /// API keys are only required by the strategy that uses them: the
    /// random-words strategy needs `WORDNIK_API_KEY`, `IMAGE_SEARCH_API_KEY` and
    /// `IMAGE_SEARCH_ENGINE_ID`; the fortune strategy needs none.
    pub fn from_env() -> Result<Self> {
        info!("Loading service configuration from environment variables");

        let strategy = match optional_var("STRATEGY") {
            Some(value) => value.parse()?,
            None => StrategyKind::default(),
        };

        let content = ContentSettings {
            num_words: Some(parse_var("NUM_WORDS", 3usize)?),
            no_results_image: optional_var("NO_RESULTS_IMAGE").map(PathBuf::from),
        };
        if content.no_results_image.is_none() {
            warn!("NO_RESULTS_IMAGE is not set - statuses without search results cannot be composed");
        }

        let wordnik_api_key = optional_var("WORDNIK_API_KEY");
        let image_search_api_key = optional_var("IMAGE_SEARCH_API_KEY");
        let image_search_engine_id = optional_var("IMAGE_SEARCH_ENGINE_ID");

        if strategy == StrategyKind::RandomWordsImage {
            for (name, value) in [
                ("WORDNIK_API_KEY", &wordnik_api_key),
                ("IMAGE_SEARCH_API_KEY", &image_search_api_key),
                ("IMAGE_SEARCH_ENGINE_ID", &image_search_engine_id),
            ] {
                match value {
                    Some(secret) => debug!("{} (masked): {}", name, mask_secret(secret)),
                    None => {
                        error!("{} is required for the random-words-image strategy", name);
                        return Err(Error::Config(format!("Missing {} environment variable", name)));
                    }
                }
            }
        }

        let fortune_command = optional_var("FORTUNE_COMMAND")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| vec!["fortune".to_string(), "-s".to_string()]);

        let config = AppConfig {
            strategy,
            random_words_count: parse_var("RANDOM_WORDS_COUNT", 0usize)?,
            use_word_of_the_day: parse_flag("USE_WORD_OF_THE_DAY")?,
            content,
            wordnik_api_key,
            wordnik_base_url: optional_var("WORDNIK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WORDNIK_BASE_URL.to_string()),
            image_search_api_key,
            image_search_engine_id,
            download_dir: optional_var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            fortune_command,
            tweet_schedule: optional_var("TWEET_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_TWEET_SCHEDULE.to_string()),
            run_once: parse_flag("RUN_ONCE")?,
            dry_run: parse_flag("DRY_RUN")?,
            port: get_server_port()?,
        };

        info!(
            "Service configuration loaded: strategy {:?}, schedule '{}', dry run {}",
            config.strategy, config.tweet_schedule, config.dry_run
        );
        Ok(config)
    }
}

/// Gets the server port from the `PORT` environment variable, defaulting to 3000.
///
/// # Returns
///
/// - `Ok(u16)`: The configured or default port
/// - `Err(Error::Config)`: If `PORT` is set but is not a valid port number
pub fn get_server_port() -> Result<u16> {
    parse_var("PORT", 3000u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "short...");
        assert_eq!(mask_secret("abcdefghijkl"), "abcdefgh...");
        assert_eq!(
            mask_secret("abcdefgh12345678ZYXWVUTS"),
            "abcdefgh...ZYXWVUTS"
        );
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!(
            "fortune".parse::<StrategyKind>().unwrap(),
            StrategyKind::Fortune
        );
        assert_eq!(
            " Random-Words-Image ".parse::<StrategyKind>().unwrap(),
            StrategyKind::RandomWordsImage
        );
        assert!("haiku".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_content_settings_lookups() {
        let settings = ContentSettings {
            num_words: Some(4),
            no_results_image: Some(PathBuf::from("/srv/no-results.png")),
        };
        assert_eq!(settings.default_num_words().unwrap(), 4);
        assert_eq!(
            settings.no_results_image().unwrap(),
            Path::new("/srv/no-results.png")
        );

        let empty = ContentSettings::default();
        assert!(matches!(empty.default_num_words(), Err(Error::Config(_))));
        assert!(matches!(empty.no_results_image(), Err(Error::Config(_))));
    }
}
