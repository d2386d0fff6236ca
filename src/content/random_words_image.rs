//! Random words with a related image.
//!
//! Fetches random words from a [`WordSource`], searches for an image matching
//! them and attaches the first image that downloads. Both network stages are
//! bounded so a composition always terminates:
//!
//! - search: up to [`MAX_SEARCH_RETRIES`] attempts, drawing fresh words each time
//! - download: up to [`MAX_IMAGE_FETCH_RETRIES`] attempts, each on a uniformly
//!   chosen result (a URL that already failed may be chosen again)
//!
//! When every search comes back empty the configured no-results image is
//! attached instead. When results exist but none downloads, the status is
//! posted without media.

use async_trait::async_trait;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::config::ContentSettings;
use crate::error::Result;
use crate::sources::{FileFetcher, ImageSearchSource, WordSource};
use crate::twitter::sanitize_for_logging;

use super::{ContentFetchStrategy, FetchedImage, TweetableStatus};

/// Maximum number of word draws and image searches per status.
pub const MAX_SEARCH_RETRIES: usize = 3;

/// Maximum number of image download attempts per status.
pub const MAX_IMAGE_FETCH_RETRIES: usize = 10;

/// Per-instance configuration of [`RandomWordsImageStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomWordsImageConfig {
    /// Total number of words in the status, including the word of the day.
    /// Zero defers to the `num-words` setting.
    pub num_words: usize,
    /// Replace one random word with the word of the day.
    pub use_word_of_the_day: bool,
}

pub struct RandomWordsImageStrategy {
    words: Arc<dyn WordSource>,
    images: Arc<dyn ImageSearchSource>,
    fetcher: Arc<dyn FileFetcher>,
    config: RandomWordsImageConfig,
    settings: ContentSettings,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl RandomWordsImageStrategy {
    pub fn new(
        words: Arc<dyn WordSource>,
        images: Arc<dyn ImageSearchSource>,
        fetcher: Arc<dyn FileFetcher>,
        config: RandomWordsImageConfig,
        settings: ContentSettings,
    ) -> Self {
        RandomWordsImageStrategy {
            words,
            images,
            fetcher,
            config,
            settings,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Replaces the random source used to pick search results.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn config(&self) -> RandomWordsImageConfig {
        self.config
    }

    /// Number of words drawn from the word source on each search attempt.
    fn words_to_fetch(&self) -> Result<usize> {
        let total = match self.config.num_words {
            0 => self.settings.default_num_words()?,
            n => n,
        };

        if self.config.use_word_of_the_day {
            Ok(total.saturating_sub(1))
        } else {
            Ok(total)
        }
    }

    async fn fetch_word_of_the_day(&self) -> Option<String> {
        match self.words.get_word_of_the_day().await {
            Ok(word) => {
                debug!("Applied word of the day: {}", word);
                Some(word.trim().to_string())
            }
            Err(e) => {
                warn!("Failed to fetch word of the day, continuing without it: {}", e);
                None
            }
        }
    }

    /// Draws `count` random words and joins them with single spaces.
    ///
    /// # Parameters
    ///
    /// - `count`: How many words to request from the word source
    ///
    /// # Returns
    ///
    /// The trimmed, space-separated words, or an empty string if the draw
    /// failed. Failures are logged, never propagated.
    async fn fetch_random_words(&self, count: usize) -> String {
        match self.words.get_random_words(count).await {
            Ok(words) => words
                .iter()
                .map(|word| word.trim())
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                warn!("Failed to fetch {} random words: {}", count, e);
                String::new()
            }
        }
    }

    /// Searches for images matching `query`.
    ///
    /// # Parameters
    ///
    /// - `query`: The random words to search for (may be empty)
    ///
    /// # Returns
    ///
    /// The result URLs in the order the search returned them. A failed
    /// search is logged and treated as no results.
    async fn search_images(&self, query: &str) -> Vec<String> {
        match self.images.search(query).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(
                    "Image search for '{}' failed: {}",
                    sanitize_for_logging(query, 100),
                    e
                );
                Vec::new()
            }
        }
    }

    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }

    async fn fetch_image(&self, candidate: &str) -> Result<FetchedImage> {
        let url = Url::parse(candidate)?;
        self.fetcher.fetch(&url).await
    }

    /// Tries random results until one downloads or the attempts run out.
    ///
    /// Each attempt picks a uniformly random index, so the same URL may be
    /// tried more than once.
    ///
    /// # Parameters
    ///
    /// - `urls`: Non-empty list of image search results
    ///
    /// # Returns
    ///
    /// - `Some(FetchedImage)`: The first image that downloaded successfully
    /// - `None`: All `MAX_IMAGE_FETCH_RETRIES` attempts failed; the status is
    ///   posted without media
    async fn download_any(&self, urls: &[String]) -> Option<FetchedImage> {
        for attempt in 1..=MAX_IMAGE_FETCH_RETRIES {
            let candidate = &urls[self.pick_index(urls.len())];
            match self.fetch_image(candidate).await {
                Ok(image) => {
                    info!(
                        "Fetched image {} on attempt {}/{}",
                        sanitize_for_logging(candidate, 200),
                        attempt,
                        MAX_IMAGE_FETCH_RETRIES
                    );
                    return Some(image);
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch image (attempt {}/{}), retrying: {}",
                        attempt, MAX_IMAGE_FETCH_RETRIES, e
                    );
                }
            }
        }

        warn!(
            "No image could be downloaded from {} results, posting without media",
            urls.len()
        );
        None
    }
}

/// Joins the word of the day (if any) and the random words with a single space.
fn compose_text(word_of_the_day: Option<&str>, random_words: &str) -> String {
    let word_of_the_day = word_of_the_day.unwrap_or_default();
    format!("{} {}", word_of_the_day, random_words)
        .trim()
        .to_string()
}

#[async_trait]
impl ContentFetchStrategy for RandomWordsImageStrategy {
    fn name(&self) -> &'static str {
        "random-words-image"
    }

    /// Composes a status from random words and a matching image.
    ///
    /// Draws words and searches up to `MAX_SEARCH_RETRIES` times. With no
    /// results after the last search, the configured no-results image is
    /// attached instead of downloading.
    ///
    /// # Returns
    ///
    /// - `Ok(TweetableStatus)`: The composed text with a downloaded image, the
    ///   no-results image, or no media if every download failed
    /// - `Err(Error::Config)`: If the word count or the no-results image is
    ///   missing from the settings when needed
    async fn tweetable_status(&self) -> Result<TweetableStatus> {
        let word_of_the_day = if self.config.use_word_of_the_day {
            self.fetch_word_of_the_day().await
        } else {
            None
        };

        let count = self.words_to_fetch()?;
        let mut random_words = String::new();
        let mut image_urls = Vec::new();

        for attempt in 1..=MAX_SEARCH_RETRIES {
            random_words = self.fetch_random_words(count).await;
            image_urls = self.search_images(&random_words).await;
            if !image_urls.is_empty() {
                debug!(
                    "Search attempt {} returned {} results",
                    attempt,
                    image_urls.len()
                );
                break;
            }
            warn!(
                "No images found for '{}' (attempt {}/{})",
                sanitize_for_logging(&random_words, 100),
                attempt,
                MAX_SEARCH_RETRIES
            );
        }

        let media = if image_urls.is_empty() {
            let fallback = self.settings.no_results_image()?;
            warn!("Using default no-results image {}", fallback.display());
            Some(FetchedImage::new(fallback))
        } else {
            self.download_any(&image_urls).await
        };

        Ok(TweetableStatus {
            text: compose_text(word_of_the_day.as_deref(), &random_words),
            media,
        })
    }
}
