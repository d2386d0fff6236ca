//! Shared application state and the compose-then-post operation used by the
//! HTTP handlers, the scheduled job and the one-shot mode.

use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{AppConfig, StrategyKind, TwitterConfig};
use crate::content::{
    ContentFetchStrategy, FortuneStrategy, RandomWordsImageConfig, RandomWordsImageStrategy,
    TweetableStatus,
};
use crate::error::{Error, Result};
use crate::sources::{FortuneCommand, GoogleImageSearch, HttpFileFetcher, WordnikClient};
use crate::twitter::{DryRunPublisher, StatusPublisher, TwitterClient};

/// The selected strategy and publisher, shared by every entry point.
#[derive(Clone)]
pub struct AppState {
    strategy: Arc<dyn ContentFetchStrategy>,
    publisher: Arc<dyn StatusPublisher>,
    // Strategies are not re-entrant; one composition runs at a time.
    compose_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        strategy: Arc<dyn ContentFetchStrategy>,
        publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        AppState {
            strategy,
            publisher,
            compose_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Builds the strategy and publisher described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(AppState::new(build_strategy(config)?, build_publisher(config)?))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Composes one status without posting it.
    ///
    /// Temporary media is left on disk; the caller discards it with
    /// [`TweetableStatus::discard_media`] when done.
    pub async fn compose(&self) -> Option<TweetableStatus> {
        let _guard = self.compose_lock.lock().await;
        self.strategy.produce_status().await
    }

    /// Composes one status and posts it. Downloaded media is removed once
    /// the publisher returns, whether or not posting succeeded.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(response))`: The publisher's response after posting
    /// - `Ok(None)`: The strategy produced nothing to post
    /// - `Err(Error)`: Posting failed
    pub async fn compose_and_post(&self) -> Result<Option<String>> {
        let _guard = self.compose_lock.lock().await;
        let Some(status) = self.strategy.produce_status().await else {
            info!("Nothing to post from {} strategy", self.strategy.name());
            return Ok(None);
        };

        let result = self.publisher.publish(&status).await;
        status.discard_media().await;

        let response = result?;
        info!("Status posted with {} strategy", self.strategy.name());
        Ok(Some(response))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::Config(format!("Missing {} environment variable", name)))
}

/// Builds the content strategy selected in `config`.
pub fn build_strategy(config: &AppConfig) -> Result<Arc<dyn ContentFetchStrategy>> {
    match config.strategy {
        StrategyKind::Fortune => {
            let command = FortuneCommand::from_command_line(&config.fortune_command)?;
            Ok(Arc::new(FortuneStrategy::new(Arc::new(command))))
        }
        StrategyKind::RandomWordsImage => {
            let words = WordnikClient::new(
                config.wordnik_base_url.clone(),
                required(&config.wordnik_api_key, "WORDNIK_API_KEY")?,
            );
            let images = GoogleImageSearch::new(
                required(&config.image_search_api_key, "IMAGE_SEARCH_API_KEY")?,
                required(&config.image_search_engine_id, "IMAGE_SEARCH_ENGINE_ID")?,
            );
            let fetcher = HttpFileFetcher::new(config.download_dir.clone());
            let strategy_config = RandomWordsImageConfig {
                num_words: config.random_words_count,
                use_word_of_the_day: config.use_word_of_the_day,
            };

            Ok(Arc::new(RandomWordsImageStrategy::new(
                Arc::new(words),
                Arc::new(images),
                Arc::new(fetcher),
                strategy_config,
                config.content.clone(),
            )))
        }
    }
}

/// Builds the publisher: a dry-run logger, or the Twitter client.
pub fn build_publisher(config: &AppConfig) -> Result<Arc<dyn StatusPublisher>> {
    if config.dry_run {
        info!("Dry run enabled - statuses will be logged, not posted");
        return Ok(Arc::new(DryRunPublisher));
    }
    Ok(Arc::new(TwitterClient::new(TwitterConfig::from_env()?)))
}
