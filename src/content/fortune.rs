//! Fortune strategy: one fortune per status, no media.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::sources::FortuneSource;

use super::{ContentFetchStrategy, TweetableStatus};

pub struct FortuneStrategy {
    source: Arc<dyn FortuneSource>,
}

impl FortuneStrategy {
    pub fn new(source: Arc<dyn FortuneSource>) -> Self {
        FortuneStrategy { source }
    }
}

#[async_trait]
impl ContentFetchStrategy for FortuneStrategy {
    fn name(&self) -> &'static str {
        "fortune"
    }

    async fn tweetable_status(&self) -> Result<TweetableStatus> {
        let fortune = self.source.get_fortune().await?;
        Ok(TweetableStatus::text(fortune))
    }
}
