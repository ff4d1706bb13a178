//! Message routing and the download pipeline front-end.
//!
//! The dptree schema has two branches: known commands, then plain text.
//! A text message walks the full pipeline — resolve via the fallback chain,
//! fetch with the size cap, send as a video attachment — while a single
//! status message is edited through the stages. Every failure is surfaced
//! as user-readable text; a catch-all at the endpoint boundary keeps one
//! bad update from taking the worker down.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::core::config;
use crate::core::error::AppResult;
use crate::core::stats::AppStats;
use crate::download::{fetch_media, DownloadOutcome, FetchError, Resolver};
use crate::telegram::bot::Command;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// First URL in a message, tracking params and all.
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("URL regex is valid"));

/// Dependencies shared by all handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub resolver: Arc<Resolver>,
    pub fetch_client: reqwest::Client,
    pub stats: Arc<AppStats>,
}

impl HandlerDeps {
    pub fn new(resolver: Arc<Resolver>, fetch_client: reqwest::Client, stats: Arc<AppStats>) -> Self {
        Self {
            resolver,
            fetch_client,
            stats,
        }
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();

    dptree::entry()
        // Command handler first so /start etc. never reach the link pipeline
        .branch(command_handler(deps_commands))
        // Plain-text handler for TikTok links
        .branch(message_handler(deps))
}

/// Handler for the /start, /help and /status commands
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let reply = match cmd {
                    Command::Start => welcome_text(),
                    Command::Help => help_text(),
                    Command::Status => status_text(&deps.stats),
                };
                if let Err(e) = bot.send_message(msg.chat.id, reply).await {
                    log::warn!("Failed to send {:?} reply to chat {}: {}", cmd, msg.chat.id, e);
                }
                Ok(())
            }
        },
    ))
}

/// Handler for plain text messages carrying (hopefully) a TikTok link
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let Some(text) = msg.text().map(str::to_owned) else {
                return Ok(());
            };

            // Catch-all boundary: a failed download must never kill the worker
            if let Err(e) = handle_link_message(&bot, &msg, &text, &deps).await {
                log::error!("Error handling message in chat {}: {}", msg.chat.id, e);
                let _ = bot
                    .send_message(msg.chat.id, "❌ Something went wrong! Please try again later.")
                    .await;
            }

            Ok(())
        }
    })
}

/// Run one inbound link through the resolve → fetch → send pipeline.
async fn handle_link_message(bot: &Bot, msg: &Message, text: &str, deps: &HandlerDeps) -> AppResult<()> {
    let request_no = deps.stats.record_request();
    log::info!("Request #{} from chat {}", request_no, msg.chat.id);

    if !text.contains("tiktok.com") && !text.contains("douyin.com") {
        bot.send_message(msg.chat.id, "❌ Please send a valid TikTok link!").await?;
        return Ok(());
    }

    let Some(link) = URL_RE.find(text).map(|m| m.as_str().to_string()) else {
        bot.send_message(msg.chat.id, "❌ No link found in the message!").await?;
        return Ok(());
    };

    let processing = bot
        .send_message(msg.chat.id, "🔄 Processing video, please wait...")
        .await?;

    match deps.resolver.resolve(&link).await {
        DownloadOutcome::Resolved(media_url) => {
            deliver_video(bot, msg, &processing, &media_url, deps).await?;
        }
        DownloadOutcome::Exhausted(reasons) => {
            log::warn!("All providers failed for {}: {:?}", link, reasons);
            bot.edit_message_text(
                msg.chat.id,
                processing.id,
                format!("❌ Could not download the video!\n\nDetails: {}", reasons.join("; ")),
            )
            .await?;
        }
    }

    Ok(())
}

/// Download the resolved media URL and send it as a video attachment.
async fn deliver_video(
    bot: &Bot,
    msg: &Message,
    processing: &Message,
    media_url: &str,
    deps: &HandlerDeps,
) -> AppResult<()> {
    bot.edit_message_text(msg.chat.id, processing.id, "📥 Downloading video...")
        .await?;

    let blob = match fetch_media(&deps.fetch_client, media_url, config::download::MAX_FILE_SIZE_BYTES).await {
        Ok(blob) => blob,
        Err(FetchError::TooLarge { .. }) => {
            bot.edit_message_text(
                msg.chat.id,
                processing.id,
                "❌ Video is too large (>50MB), Telegram won't accept it!",
            )
            .await?;
            return Ok(());
        }
        Err(FetchError::BadStatus(code)) => {
            bot.edit_message_text(msg.chat.id, processing.id, format!("❌ Video download failed: HTTP {}", code))
                .await?;
            return Ok(());
        }
        Err(FetchError::Transport(e)) => {
            log::error!("Media fetch failed for {}: {}", media_url, e);
            bot.edit_message_text(
                msg.chat.id,
                processing.id,
                "❌ Video download failed, please try again later.",
            )
            .await?;
            return Ok(());
        }
    };

    bot.edit_message_text(msg.chat.id, processing.id, "📤 Sending video...")
        .await?;

    let video = InputFile::memory(blob.data).file_name(blob.file_name);
    let sent = bot
        .send_video(msg.chat.id, video)
        .caption("✅ TikTok video downloaded!\n🎬 No watermark")
        .supports_streaming(true)
        .await;

    match sent {
        Ok(_) => {
            let _ = bot.delete_message(msg.chat.id, processing.id).await;
        }
        Err(e) => {
            log::error!("Error sending video to chat {}: {}", msg.chat.id, e);
            bot.edit_message_text(
                msg.chat.id,
                processing.id,
                "❌ Failed to send the video, please try again later.",
            )
            .await?;
        }
    }

    Ok(())
}

fn welcome_text() -> String {
    "🎬 TikTok Video Downloader Bot\n\n\
     Send me a TikTok link and I'll reply with the video, no watermark.\n\
     Both full links and vm./vt. short links work.\n\n\
     Commands:\n\
     /start - this message\n\
     /help - usage instructions\n\
     /status - bot status\n\n\
     Try sending a TikTok link! 🚀"
        .to_string()
}

fn help_text() -> String {
    "🆘 How to use\n\n\
     1. Send a TikTok link:\n\
        • full: https://www.tiktok.com/@username/video/1234567890\n\
        • short: https://vm.tiktok.com/abcdef\n\n\
     2. The bot will:\n\
        • download the video without watermark\n\
        • send back the best quality it can find\n\
        • tell you what went wrong otherwise\n\n\
     3. Notes:\n\
        • the video must be public\n\
        • videos over 50MB cannot be sent through Telegram\n\
        • if it fails, try again in a minute"
        .to_string()
}

fn status_text(stats: &AppStats) -> String {
    format!(
        "🤖 Bot status\n\n\
         • Status: running ✅\n\
         • Uptime: {}\n\
         • Requests processed: {}\n\
         • Time: {}",
        stats.uptime_human(),
        stats.requests_processed(),
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
