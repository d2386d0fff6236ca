//! Wordnik dictionary client.
//!
//! Implements [`WordSource`] over the Wordnik v4 REST API.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::twitter::sanitize_for_logging;

use super::WordSource;

const SOURCE_NAME: &str = "Wordnik";

#[derive(Debug, Deserialize)]
struct WordEntry {
    word: String,
}

/// HTTP client for the Wordnik word API.
#[derive(Debug, Clone)]
pub struct WordnikClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WordnikClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        WordnikClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn random_words_url(&self, count: usize) -> String {
        format!(
            "{}/words.json/randomWords?hasDictionaryDef=true&limit={}&api_key={}",
            self.base_url,
            count,
            urlencoding::encode(&self.api_key)
        )
    }

    fn word_of_the_day_url(&self) -> String {
        format!(
            "{}/words.json/wordOfTheDay?api_key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn get_text(&self, url: &str, operation: &str) -> Result<String> {
        debug!("Sending Wordnik request for operation: {}", operation);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "Wordnik operation '{}' failed - Status: {}, body: {}",
                operation,
                status,
                sanitize_for_logging(&body, 200)
            );
            return Err(Error::unavailable(
                SOURCE_NAME,
                format!("{} returned status {}", operation, status),
            ));
        }
        Ok(body)
    }
}

fn parse_random_words(body: &str) -> Result<Vec<String>> {
    let entries: Vec<WordEntry> = serde_json::from_str(body)?;
    Ok(entries.into_iter().map(|entry| entry.word).collect())
}

fn parse_word_of_the_day(body: &str) -> Result<String> {
    let entry: WordEntry = serde_json::from_str(body)?;
    Ok(entry.word)
}

#[async_trait]
impl WordSource for WordnikClient {
    async fn get_random_words(&self, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let body = self
            .get_text(&self.random_words_url(count), "random_words")
            .await?;
        let words = parse_random_words(&body)?;
        info!("Fetched {} random words from Wordnik", words.len());
        Ok(words)
    }

    async fn get_word_of_the_day(&self) -> Result<String> {
        let body = self
            .get_text(&self.word_of_the_day_url(), "word_of_the_day")
            .await?;
        parse_word_of_the_day(&body)
    }
}
