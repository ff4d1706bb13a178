use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use tokgrab::core::health_server::start_health_server;
use tokgrab::core::{config, init_logger, AppStats};
use tokgrab::download::{fetch_client, Resolver};
use tokgrab::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, missing token, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // The token is the one non-recoverable startup requirement
    if config::BOT_TOKEN.is_empty() {
        log::error!("BOT_TOKEN not found in environment variables!");
        anyhow::bail!("BOT_TOKEN not found in environment variables");
    }

    let stats = Arc::new(AppStats::new());

    // Health check server runs on its own task so a slow download
    // never starves a liveness probe
    let health_stats = Arc::clone(&stats);
    let health_port = *config::PORT;
    tokio::spawn(async move {
        if let Err(e) = start_health_server(health_port, health_stats).await {
            log::error!("Health check server failed: {}", e);
        }
    });

    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let deps = HandlerDeps::new(Arc::new(Resolver::new()), fetch_client(), stats);

    log::info!("================================================");
    log::info!("🚀 Bot is running...");
    log::info!("🌐 Health check server on port {}", health_port);
    log::info!("📡 Ready to receive updates!");
    log::info!("================================================");

    Dispatcher::builder(bot, schema(deps))
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");

    Ok(())
}
