//! Image search over the Google Custom Search JSON API.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::twitter::sanitize_for_logging;

use super::ImageSearchSource;

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Image search backed by a Programmable Search Engine.
#[derive(Debug, Clone)]
pub struct GoogleImageSearch {
    client: Client,
    api_key: String,
    engine_id: String,
}

impl GoogleImageSearch {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        GoogleImageSearch {
            client: Client::new(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?key={}&cx={}&searchType=image&safe=active&q={}",
            SEARCH_URL,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.engine_id),
            urlencoding::encode(query)
        )
    }
}

/// Extracts image links from a search response body. A response without
/// `items` is a search with no results.
fn parse_image_links(body: &str) -> Result<Vec<String>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.items.into_iter().map(|item| item.link).collect())
}

#[async_trait]
impl ImageSearchSource for GoogleImageSearch {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        info!("Searching images for '{}'", sanitize_for_logging(query, 100));

        let response = self.client.get(self.search_url(query)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "Image search failed - Status: {}, body: {}",
                status,
                sanitize_for_logging(&body, 200)
            );
            return Err(Error::unavailable(
                "Image search",
                format!("search returned status {}", status),
            ));
        }

        let links = parse_image_links(&body)?;
        debug!("Image search returned {} results", links.len());
        Ok(links)
    }
}
