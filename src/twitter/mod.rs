//! Twitter/X API integration module.
//!
//! This module publishes composed statuses: media upload followed by a tweet
//! through the v2 endpoints, using OAuth 2.0 User Context authentication.

mod api;
mod media;
mod tweets;

use async_trait::async_trait;
use log::info;
use reqwest::Client;

use crate::config::TwitterConfig;
use crate::content::TweetableStatus;
use crate::error::Result;

pub use api::build_oauth2_user_context_header;
pub use tweets::MAX_TWEET_CHARS;

// Crate-internal re-exports (used by sources and strategies for logging)
pub(crate) use api::sanitize_for_logging;

/// Output boundary: something that takes a composed status and posts it.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Publishes `status`, returning the service's response.
    async fn publish(&self, status: &TweetableStatus) -> Result<String>;
}

/// Publishes statuses to Twitter/X.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: Client,
    config: TwitterConfig,
}

impl TwitterClient {
    pub fn new(config: TwitterConfig) -> Self {
        TwitterClient {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl StatusPublisher for TwitterClient {
    async fn publish(&self, status: &TweetableStatus) -> Result<String> {
        let mut media_ids = Vec::new();
        if let Some(image) = &status.media {
            media_ids.push(media::upload_media(&self.client, &self.config, image).await?);
        }

        tweets::post_tweet(&self.client, &self.config, &status.text, &media_ids).await
    }
}

/// Logs statuses instead of posting them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPublisher;

#[async_trait]
impl StatusPublisher for DryRunPublisher {
    async fn publish(&self, status: &TweetableStatus) -> Result<String> {
        let media = status
            .media
            .as_ref()
            .map(|image| image.path().display().to_string())
            .unwrap_or_else(|| "none".to_string());
        info!(
            "Dry run - would post '{}' with media {}",
            sanitize_for_logging(&status.text, 300),
            media
        );
        Ok(serde_json::to_string(status)?)
    }
}
