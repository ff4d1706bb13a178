use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
/// Empty string if neither is set — checked at startup, the bot refuses to run without it
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Health check server port
/// Read from PORT environment variable
/// Default: 5000
pub static PORT: Lazy<u16> = Lazy::new(|| {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000)
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// User agent sent on every scraping request.
/// Mirror services block obvious bot user agents, so we present as desktop Chrome.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Network timeout configuration
pub mod network {
    use super::Duration;

    /// Timeout for resolving short links via redirects (in seconds)
    pub const SHORT_LINK_TIMEOUT_SECS: u64 = 15;

    /// Timeout for priming requests to a provider's landing page (in seconds)
    pub const PRIME_TIMEOUT_SECS: u64 = 20;

    /// Timeout for submitting a link to a provider's processing endpoint (in seconds)
    pub const SUBMIT_TIMEOUT_SECS: u64 = 20;

    /// Timeout for downloading the resolved media file (in seconds)
    pub const FETCH_TIMEOUT_SECS: u64 = 90;

    /// Timeout for Telegram API requests (in seconds)
    /// Generous because uploading a 50MB video over a slow link takes a while
    pub const TELEGRAM_TIMEOUT_SECS: u64 = 120;

    /// Short link resolution timeout duration
    pub fn short_link_timeout() -> Duration {
        Duration::from_secs(SHORT_LINK_TIMEOUT_SECS)
    }

    /// Provider priming timeout duration
    pub fn prime_timeout() -> Duration {
        Duration::from_secs(PRIME_TIMEOUT_SECS)
    }

    /// Provider submit timeout duration
    pub fn submit_timeout() -> Duration {
        Duration::from_secs(SUBMIT_TIMEOUT_SECS)
    }

    /// Media fetch timeout duration
    pub fn fetch_timeout() -> Duration {
        Duration::from_secs(FETCH_TIMEOUT_SECS)
    }

    /// Telegram API timeout duration
    pub fn telegram_timeout() -> Duration {
        Duration::from_secs(TELEGRAM_TIMEOUT_SECS)
    }
}

/// Download configuration
pub mod download {
    /// Maximum media size Telegram lets a bot upload (50MB)
    /// Anything larger is rejected mid-stream, before the transfer completes
    pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

    /// Synthetic filename attached to downloaded videos
    pub const VIDEO_FILE_NAME: &str = "tokgrab_video.mp4";
}

/// Fallback chain configuration
pub mod resolver {
    /// Minimum delay between provider attempts (milliseconds)
    pub const ATTEMPT_DELAY_MIN_MS: u64 = 1000;

    /// Maximum delay between provider attempts (milliseconds)
    /// The delay is uniformly sampled from [min, max] — politeness towards
    /// the mirror services, not a correctness requirement
    pub const ATTEMPT_DELAY_MAX_MS: u64 = 3000;
}
