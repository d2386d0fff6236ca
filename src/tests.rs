//! # Tests Module
//!
//! Router-level tests for the tweeter service plus configuration loading.
//!
//! ## Test Categories
//!
//! ### Unit Tests
//! - Configuration loading (`AppConfig::from_env`, `get_server_port`)
//! - Handler functions called directly
//!
//! ### Integration Tests
//! - HTTP endpoint testing for all routes against scripted strategies
//! - Error responses when nothing can be composed or posting fails
//! - Removal of downloaded media after posting or previewing
//!
//! No test talks to a real network service: strategies and publishers are
//! in-memory stand-ins.

use crate::{
    app::AppState,
    config::{get_server_port, AppConfig, StrategyKind},
    content::{ContentFetchStrategy, FetchedImage, TweetableStatus},
    error::{Error, Result},
    handlers::{handle_health, handle_root, router},
    twitter::{DryRunPublisher, StatusPublisher},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Strategy that always yields the same result.
struct FixedStrategy(Option<TweetableStatus>);

#[async_trait]
impl ContentFetchStrategy for FixedStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn tweetable_status(&self) -> Result<TweetableStatus> {
        self.0
            .clone()
            .ok_or_else(|| Error::Config("no-results-image is not configured".to_string()))
    }
}

/// Publisher that records what it was asked to post.
#[derive(Default)]
struct RecordingPublisher {
    fail: bool,
    posted: Mutex<Vec<TweetableStatus>>,
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn publish(&self, status: &TweetableStatus) -> Result<String> {
        if self.fail {
            return Err(Error::TwitterApi {
                operation: "post_tweet".to_string(),
                status: 401,
            });
        }
        self.posted.lock().unwrap().push(status.clone());
        Ok(r#"{"data":{"id":"1"}}"#.to_string())
    }
}

fn fox_status() -> TweetableStatus {
    TweetableStatus {
        text: "quiet red fox".to_string(),
        media: Some(FetchedImage::new("/tmp/fox.jpg")),
    }
}

/// Creates a test application around the given strategy and publisher.
fn create_test_app(
    strategy: Option<TweetableStatus>,
    publisher: Arc<dyn StatusPublisher>,
) -> Router {
    router(AppState::new(Arc::new(FixedStrategy(strategy)), publisher))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_handle_root() {
    assert_eq!(handle_root().await, "Tweeter is composing!");
}

#[tokio::test]
async fn test_handle_health() {
    let Json(json_response): Json<Value> = handle_health().await;

    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "tweeter");
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app(None, Arc::new(DryRunPublisher));

    let request = Request::builder()
        .uri("/")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(String::from_utf8(body.to_vec()).unwrap(), "Tweeter is composing!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(None, Arc::new(DryRunPublisher));

    let (status, json) = send(app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_preview_does_not_post() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = create_test_app(Some(fox_status()), publisher.clone());

    let (status, json) = send(app, "GET", "/preview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["strategy"], "fixed");
    assert_eq!(json["tweet"]["text"], "quiet red fox");
    assert_eq!(json["tweet"]["media"], "/tmp/fox.jpg");
    assert!(publisher.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_tweet_endpoint_posts_composed_status() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = create_test_app(Some(fox_status()), publisher.clone());

    let (status, json) = send(app, "POST", "/tweet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(*publisher.posted.lock().unwrap(), vec![fox_status()]);
}

#[tokio::test]
async fn test_tweet_endpoint_with_nothing_to_post() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = create_test_app(None, publisher.clone());

    let (status, json) = send(app, "POST", "/tweet").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Nothing to post");
    assert!(publisher.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_tweet_endpoint_when_posting_fails() {
    let publisher = Arc::new(RecordingPublisher {
        fail: true,
        ..Default::default()
    });
    let app = create_test_app(Some(fox_status()), publisher);

    let (status, json) = send(app, "POST", "/tweet").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to post tweet");
    assert!(json["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_compose_and_post_reports_nothing_to_post() {
    let state = AppState::new(Arc::new(FixedStrategy(None)), Arc::new(DryRunPublisher));
    assert!(state.compose_and_post().await.unwrap().is_none());

    let state = AppState::new(
        Arc::new(FixedStrategy(Some(fox_status()))),
        Arc::new(DryRunPublisher),
    );
    assert!(state.compose_and_post().await.unwrap().is_some());
}

/// Strategy that downloads a fresh image into `dir` for every status, or
/// hands out the configured no-results image when `dir` is `None`.
struct DownloadingStrategy {
    dir: Option<PathBuf>,
    fallback: PathBuf,
    count: AtomicUsize,
}

#[async_trait]
impl ContentFetchStrategy for DownloadingStrategy {
    fn name(&self) -> &'static str {
        "downloading"
    }

    async fn tweetable_status(&self) -> Result<TweetableStatus> {
        let media = match &self.dir {
            Some(dir) => {
                let n = self.count.fetch_add(1, Ordering::SeqCst);
                let path = dir.join(format!("{:08x}-fox.jpg", n));
                tokio::fs::write(&path, b"jpeg").await?;
                FetchedImage::downloaded(path, "image/jpeg")
            }
            None => FetchedImage::new(&self.fallback),
        };
        Ok(TweetableStatus {
            text: "quiet red fox".to_string(),
            media: Some(media),
        })
    }
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_posting_removes_downloaded_media() {
    let downloads = tempfile::tempdir().unwrap();
    let strategy = Arc::new(DownloadingStrategy {
        dir: Some(downloads.path().to_path_buf()),
        fallback: PathBuf::new(),
        count: AtomicUsize::new(0),
    });

    let publisher = Arc::new(RecordingPublisher::default());
    let state = AppState::new(strategy.clone(), publisher.clone());
    assert!(state.compose_and_post().await.unwrap().is_some());
    assert!(state.compose_and_post().await.unwrap().is_some());
    assert_eq!(publisher.posted.lock().unwrap().len(), 2);
    assert_eq!(entries(downloads.path()), 0);

    // A failed post cleans up too
    let failing = Arc::new(RecordingPublisher {
        fail: true,
        ..Default::default()
    });
    let state = AppState::new(strategy.clone(), failing);
    assert!(state.compose_and_post().await.is_err());
    assert!(state.compose_and_post().await.is_err());
    assert_eq!(entries(downloads.path()), 0);
    assert_eq!(strategy.count.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_posting_keeps_no_results_image() {
    let assets = tempfile::tempdir().unwrap();
    let fallback = assets.path().join("no-results.png");
    std::fs::write(&fallback, b"png").unwrap();

    let strategy = Arc::new(DownloadingStrategy {
        dir: None,
        fallback: fallback.clone(),
        count: AtomicUsize::new(0),
    });
    let state = AppState::new(strategy, Arc::new(RecordingPublisher::default()));
    assert!(state.compose_and_post().await.unwrap().is_some());
    assert!(state.compose_and_post().await.unwrap().is_some());
    assert!(fallback.exists());
}

#[tokio::test]
async fn test_preview_removes_downloaded_media() {
    let downloads = tempfile::tempdir().unwrap();
    let strategy = Arc::new(DownloadingStrategy {
        dir: Some(downloads.path().to_path_buf()),
        fallback: PathBuf::new(),
        count: AtomicUsize::new(0),
    });
    let app = router(AppState::new(strategy, Arc::new(DryRunPublisher)));

    let (status, json) = send(app, "GET", "/preview").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["tweet"]["media"].as_str().unwrap().ends_with("-fox.jpg"));
    assert_eq!(entries(downloads.path()), 0);
}

/// Environment-driven configuration. Kept in one test because the process
/// environment is shared between test threads.
#[test]
fn test_config_from_env() {
    let vars = [
        "PORT",
        "STRATEGY",
        "NUM_WORDS",
        "RANDOM_WORDS_COUNT",
        "USE_WORD_OF_THE_DAY",
        "NO_RESULTS_IMAGE",
        "WORDNIK_API_KEY",
        "IMAGE_SEARCH_API_KEY",
        "IMAGE_SEARCH_ENGINE_ID",
        "DRY_RUN",
        "RUN_ONCE",
        "TWEET_SCHEDULE",
        "FORTUNE_COMMAND",
    ];
    for var in vars {
        std::env::remove_var(var);
    }

    // Default port
    assert_eq!(get_server_port().unwrap(), 3000);
    std::env::set_var("PORT", "8080");
    assert_eq!(get_server_port().unwrap(), 8080);
    std::env::set_var("PORT", "not-a-port");
    assert!(get_server_port().is_err());
    std::env::remove_var("PORT");

    // The default strategy needs its API keys
    assert!(matches!(AppConfig::from_env(), Err(Error::Config(_))));

    std::env::set_var("WORDNIK_API_KEY", "wordnik-key");
    std::env::set_var("IMAGE_SEARCH_API_KEY", "search-key");
    std::env::set_var("IMAGE_SEARCH_ENGINE_ID", "engine");
    std::env::set_var("RANDOM_WORDS_COUNT", "4");
    std::env::set_var("USE_WORD_OF_THE_DAY", "true");
    std::env::set_var("NO_RESULTS_IMAGE", "/srv/no-results.png");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.strategy, StrategyKind::RandomWordsImage);
    assert_eq!(config.random_words_count, 4);
    assert!(config.use_word_of_the_day);
    assert_eq!(config.content.num_words, Some(3));
    assert_eq!(
        config.content.no_results_image.as_deref(),
        Some(std::path::Path::new("/srv/no-results.png"))
    );
    assert_eq!(config.fortune_command, vec!["fortune", "-s"]);

    std::env::set_var("USE_WORD_OF_THE_DAY", "maybe");
    assert!(AppConfig::from_env().is_err());

    // Fortunes need no API keys
    for var in vars {
        std::env::remove_var(var);
    }
    std::env::set_var("STRATEGY", "fortune");
    std::env::set_var("DRY_RUN", "1");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.strategy, StrategyKind::Fortune);
    assert!(config.dry_run);
    assert!(AppState::from_config(&config).is_ok());

    for var in vars {
        std::env::remove_var(var);
    }
}
