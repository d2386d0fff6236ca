//! Status Preview Script
//!
//! Composes one status with the strategy configured in the environment and
//! prints it, without posting anything. Handy for checking API keys and the
//! fallback image before enabling the scheduled bot.

use tweeter::{AppConfig, ContentFetchStrategy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    println!("🐦 Tweeter Status Preview");
    println!("=========================");

    let config = AppConfig::from_env()?;
    println!("🧩 Strategy: {:?}", config.strategy);

    let strategy = tweeter::app::build_strategy(&config)?;

    println!("\n🚀 Composing status...");
    match strategy.produce_status().await {
        Some(status) => {
            println!("\n📝 Text: {}", status.text);
            println!("📏 Length: {} characters", status.text.chars().count());
            match &status.media {
                Some(image) => println!("🖼️  Media: {}", image.path().display()),
                None => println!("🖼️  Media: none"),
            }
            if status.text.chars().count() > tweeter::twitter::MAX_TWEET_CHARS {
                println!(
                    "⚠️  Too long to post (max {} characters)",
                    tweeter::twitter::MAX_TWEET_CHARS
                );
            }
            status.discard_media().await;
        }
        None => {
            println!("\n💥 Nothing to post - check the logs (RUST_LOG=debug) for details");
            return Err("No status could be composed".into());
        }
    }

    Ok(())
}
