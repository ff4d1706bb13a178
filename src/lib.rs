//! Tokgrab - Telegram bot for downloading TikTok videos without watermark
//!
//! The core is a sequential fallback chain over three third-party mirror
//! services, plus URL normalization, a size-capped in-memory media fetcher,
//! and a liveness HTTP server for uptime monitors.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, stats, and the health server
//! - `download`: link normalization, provider adapters, fallback chain, fetcher
//! - `telegram`: bot integration and message handlers

pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppStats};
pub use download::{fetch_media, DownloadOutcome, MediaBlob, Resolver};
pub use telegram::{schema, HandlerDeps};
