//! HTTP route handlers for the tweeter service.
//!
//! This module contains the handler functions behind the service's routes and
//! the router that wires them to the shared [`AppState`].

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde_json::{json, Value};

use crate::app::AppState;

type HandlerResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn error_response(message: &str, detail: Option<String>) -> (StatusCode, Json<Value>) {
    let mut body = json!({"status": "error", "message": message});
    if let Some(detail) = detail {
        body["error"] = Value::String(detail);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}

/// Builds the router with all service routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/preview", get(handle_preview))
        .route("/tweet", post(handle_tweet))
        .with_state(state)
}

/// Handles GET requests to the `/` endpoint with a welcome message.
pub async fn handle_root() -> &'static str {
    "Tweeter is composing!"
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "tweeter"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "tweeter"}))
}

/// Handles GET requests to the `/preview` endpoint.
///
/// Composes a status with the configured strategy and returns it without
/// posting. Downloaded media is removed before responding.
///
/// # Success Response
///
/// ```json
/// {
///   "status": "success",
///   "strategy": "random-words-image",
///   "tweet": { "text": "quiet red fox", "media": "/tmp/1a2b3c4d-fox.jpg" }
/// }
/// ```
pub async fn handle_preview(State(state): State<AppState>) -> HandlerResult {
    match state.compose().await {
        Some(status) => {
            info!("Preview composed with {} strategy", state.strategy_name());
            let body = json!({
                "status": "success",
                "strategy": state.strategy_name(),
                "tweet": &status,
            });
            status.discard_media().await;
            Ok(Json(body))
        }
        None => Err(error_response("Nothing to post", None)),
    }
}

/// Handles POST requests to the `/tweet` endpoint.
///
/// Composes a status with the configured strategy and posts it.
///
/// # Error Response
///
/// ```json
/// {
///   "status": "error",
///   "message": "Failed to post tweet",
///   "error": "<error details>"
/// }
/// ```
pub async fn handle_tweet(State(state): State<AppState>) -> HandlerResult {
    match state.compose_and_post().await {
        Ok(Some(response)) => {
            info!("Tweet posted successfully");
            Ok(Json(
                json!({"status": "success", "message": "Tweet posted", "response": response}),
            ))
        }
        Ok(None) => Err(error_response("Nothing to post", None)),
        Err(e) => {
            error!("Failed to post tweet: {}", e);
            Err(error_response("Failed to post tweet", Some(e.to_string())))
        }
    }
}
