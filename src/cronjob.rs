//! Cronjob module for scheduled posting.
//!
//! This module schedules the compose-and-post operation on a cron expression.

use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::app::AppState;
use crate::error::Result;

/// Creates a job scheduler that composes and posts a status on `schedule`.
///
/// The schedule is a `tokio-cron-scheduler` cron expression with a seconds
/// field, e.g. `"0 0 0/4 * * * *"` for every four hours on the hour.
///
/// # Returns
///
/// - `Ok(JobScheduler)`: The configured (not yet started) job scheduler
/// - `Err(Error::Scheduler)`: If the scheduler cannot be created or the cron expression is invalid
///
/// # Example
///
/// ```rust,no_run
/// use tweeter::{start_post_cronjob, AppConfig, AppState};
///
/// #[tokio::main]
/// async fn main() {
///     let config = AppConfig::from_env().unwrap();
///     let state = AppState::from_config(&config).unwrap();
///     let scheduler = start_post_cronjob(state, &config.tweet_schedule).await.unwrap();
///     scheduler.start().await.unwrap();
///
///     tokio::signal::ctrl_c().await.unwrap();
/// }
/// ```
pub async fn start_post_cronjob(state: AppState, schedule: &str) -> Result<JobScheduler> {
    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async(schedule, move |_uuid, _l| {
            let state = state.clone();
            Box::pin(async move {
                info!(
                    "Starting scheduled post with {} strategy",
                    state.strategy_name()
                );
                match state.compose_and_post().await {
                    Ok(Some(_)) => info!("Scheduled post completed successfully"),
                    Ok(None) => info!("Scheduled post skipped - nothing to post"),
                    Err(e) => error!("Scheduled post failed: {}", e),
                }
            })
        })?)
        .await?;

    info!("Cronjob scheduler configured to post on schedule '{}'", schedule);
    Ok(sched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentFetchStrategy, TweetableStatus};
    use crate::twitter::DryRunPublisher;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl ContentFetchStrategy for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        async fn tweetable_status(&self) -> Result<TweetableStatus> {
            Ok(TweetableStatus::text("shh"))
        }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(Silent), Arc::new(DryRunPublisher))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_valid_schedule_is_accepted() {
        assert!(start_post_cronjob(state(), "0 0 0/4 * * * *").await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_schedule_is_rejected() {
        assert!(start_post_cronjob(state(), "every tuesday").await.is_err());
    }
}
