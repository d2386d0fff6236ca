//! # Tweeter
//!
//! A Twitter/X bot that composes statuses from random words and a related
//! image (or from fortunes) and posts them on a schedule.
//!
//! ## Modes
//!
//! - Default: runs the HTTP server (`/`, `/health`, `/preview`, `/tweet`) and
//!   posts on the `TWEET_SCHEDULE` cron expression.
//! - `RUN_ONCE=true`: composes and posts a single status, then exits.
//!
//! # Example Usage
//!
//! ```bash
//! # Compose fortunes every four hours, logging instead of posting
//! STRATEGY=fortune DRY_RUN=true cargo run
//!
//! # Post one random-words status and exit, with debug logging
//! RUN_ONCE=true RUST_LOG=debug cargo run
//! ```

use log::{error, info};
use std::net::SocketAddr;
use std::process::ExitCode;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use tweeter::{router, start_post_cronjob, AppConfig, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logging system
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to set up {:?} strategy: {}", config.strategy, e);
            return ExitCode::FAILURE;
        }
    };

    if config.run_once {
        return match state.compose_and_post().await {
            Ok(Some(_)) => {
                info!("Status posted, exiting");
                ExitCode::SUCCESS
            }
            Ok(None) => {
                info!("Nothing to post, exiting");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to post status: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Start the cronjob scheduler for periodic posting
    let cron_state = state.clone();
    let schedule = config.tweet_schedule.clone();
    let cronjob_handle = tokio::spawn(async move {
        match start_post_cronjob(cron_state, &schedule).await {
            Ok(scheduler) => {
                info!("Starting posting cronjob");
                if let Err(e) = scheduler.start().await {
                    error!("Failed to start cronjob scheduler: {}", e);
                    return;
                }
                // Keep the scheduler running indefinitely
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                }
            }
            Err(e) => {
                error!("Failed to create cronjob scheduler: {}", e);
            }
        }
    });

    let app = router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Starting tweeter server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    // Run both the HTTP server and cronjob concurrently
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        _ = cronjob_handle => {
            info!("Cronjob task completed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping");
        }
    }

    ExitCode::SUCCESS
}
