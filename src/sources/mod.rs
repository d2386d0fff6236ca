//! Collaborators the content strategies draw from.
//!
//! Each source is a trait so strategies can be driven by the HTTP-backed
//! adapters in production and by scripted stand-ins in tests.

mod fortune;
mod image_search;
mod remote_file;
mod wordnik;

use async_trait::async_trait;
use url::Url;

use crate::content::FetchedImage;
use crate::error::Result;

pub use fortune::FortuneCommand;
pub use image_search::GoogleImageSearch;
pub use remote_file::{HttpFileFetcher, MAX_IMAGE_BYTES};
pub use wordnik::WordnikClient;

/// Dictionary service providing random words and a word of the day.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Fetches `count` random words, in the order the source returns them.
    async fn get_random_words(&self, count: usize) -> Result<Vec<String>>;

    /// Fetches today's word of the day.
    async fn get_word_of_the_day(&self) -> Result<String>;
}

/// Image search service.
#[async_trait]
pub trait ImageSearchSource: Send + Sync {
    /// Searches for images matching `query`. An empty list means no results.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Downloads remote files to local storage.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Downloads `url` and returns a handle to the local copy.
    async fn fetch(&self, url: &Url) -> Result<FetchedImage>;
}

/// Source of fortune texts.
#[async_trait]
pub trait FortuneSource: Send + Sync {
    async fn get_fortune(&self) -> Result<String>;
}
