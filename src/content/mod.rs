//! Content strategies.
//!
//! A strategy composes one postable status from its own collaborators and
//! configuration. Strategies are selected once at startup and invoked once per
//! post; nothing is carried over between invocations.

mod fortune;
mod random_words_image;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use fortune::FortuneStrategy;
pub use random_words_image::{
    RandomWordsImageConfig, RandomWordsImageStrategy, MAX_IMAGE_FETCH_RETRIES, MAX_SEARCH_RETRIES,
};

/// Handle to a local image file attached to a status.
///
/// Images downloaded for a single status are temporary and are removed with
/// [`FetchedImage::discard`] once the status has been handled. Configured
/// images (such as the no-results image) are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FetchedImage {
    path: PathBuf,
    #[serde(skip)]
    mime_type: Option<String>,
    #[serde(skip)]
    temporary: bool,
}

impl FetchedImage {
    /// A handle to an existing, configured file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FetchedImage {
            path: path.into(),
            mime_type: None,
            temporary: false,
        }
    }

    /// A handle to a file downloaded for one status, with the MIME type the
    /// server reported for it.
    pub fn downloaded(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        FetchedImage {
            path: path.into(),
            mime_type: Some(mime_type.into()),
            temporary: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Removes the file if it was downloaded for this status. Failures are
    /// logged, not returned.
    pub async fn discard(&self) {
        if !self.temporary {
            return;
        }
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed downloaded image {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove downloaded image {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// A status ready for posting: text plus an optional media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetableStatus {
    pub text: String,
    pub media: Option<FetchedImage>,
}

impl TweetableStatus {
    /// A text-only status.
    pub fn text(text: impl Into<String>) -> Self {
        TweetableStatus {
            text: text.into(),
            media: None,
        }
    }

    /// Removes any temporary media attached to the status.
    pub async fn discard_media(&self) {
        if let Some(image) = &self.media {
            image.discard().await;
        }
    }
}

/// A pluggable algorithm for producing one postable status.
#[async_trait]
pub trait ContentFetchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Composes a status. Errors returned here are the failures the strategy
    /// could not recover from.
    async fn tweetable_status(&self) -> Result<TweetableStatus>;

    /// Composes a status, logging any unrecoverable failure.
    ///
    /// `None` means there is nothing to post this time.
    async fn produce_status(&self) -> Option<TweetableStatus> {
        match self.tweetable_status().await {
            Ok(status) => {
                info!(
                    "Composed status with {} strategy ({} characters, media: {})",
                    self.name(),
                    status.text.chars().count(),
                    status.media.is_some()
                );
                Some(status)
            }
            Err(e) => {
                error!("Failed to compose status with {} strategy: {}", self.name(), e);
                None
            }
        }
    }
}
