//! Tweet operations for Twitter API.
//!
//! This module contains the function for posting tweets, optionally with
//! attached media, using the Twitter API v2.

use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::TwitterConfig;
use crate::error::{Error, Result};

use super::api::{build_oauth2_user_context_header, send_authenticated_request, API_BASE};

/// Twitter's limit on tweet length, in characters.
pub const MAX_TWEET_CHARS: usize = 280;

/// Builds the JSON payload for a tweet, attaching media ids when present.
pub(crate) fn tweet_payload(text: &str, media_ids: &[String]) -> Value {
    if media_ids.is_empty() {
        json!({ "text": text })
    } else {
        json!({
            "text": text,
            "media": { "media_ids": media_ids }
        })
    }
}

/// Posts a tweet to Twitter/X using the API v2 endpoint.
///
/// # Parameters
///
/// - `text`: The text content of the tweet to post
/// - `media_ids`: Ids of previously uploaded media to attach
///
/// # Returns
///
/// - `Ok(String)`: The API response body on successful tweet posting
/// - `Err(Error)`: If the text is too long, or on network or API errors
pub(crate) async fn post_tweet(
    client: &Client,
    config: &TwitterConfig,
    text: &str,
    media_ids: &[String],
) -> Result<String> {
    let length = text.chars().count();
    if length > MAX_TWEET_CHARS {
        return Err(Error::TweetTooLong(length));
    }

    info!(
        "Starting tweet post operation for text: '{}' with {} media",
        text,
        media_ids.len()
    );

    let url = format!("{}/tweets", API_BASE);
    let payload = tweet_payload(text, media_ids);
    debug!("Tweet payload: {}", serde_json::to_string_pretty(&payload)?);
    debug!("Request headers: Authorization: Bearer [REDACTED], Content-Type: application/json");

    let request_builder = client
        .post(&url)
        .header(
            "Authorization",
            build_oauth2_user_context_header(&config.access_token),
        )
        .header("Content-Type", "application/json")
        .json(&payload);

    send_authenticated_request(request_builder, "post_tweet").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tweet_payload() {
        assert_eq!(tweet_payload("hello", &[]), json!({"text": "hello"}));
        assert_eq!(
            tweet_payload("hello", &["42".to_string()]),
            json!({"text": "hello", "media": {"media_ids": ["42"]}})
        );
    }

    #[tokio::test]
    async fn test_overlong_tweet_is_rejected_before_sending() {
        let config = TwitterConfig {
            access_token: "token".to_string(),
        };
        let text = "x".repeat(MAX_TWEET_CHARS + 1);

        let result = post_tweet(&Client::new(), &config, &text, &[]).await;
        assert!(matches!(result, Err(Error::TweetTooLong(281))));
    }
}
