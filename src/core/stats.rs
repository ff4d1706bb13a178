//! Process-scoped runtime statistics.
//!
//! Owns the start timestamp and the request counter that used to be loose
//! globals; the health server and the /status command only ever see them
//! through read accessors. The counter is best-effort telemetry — a relaxed
//! atomic is plenty.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Uptime and request-count bookkeeping for the whole process.
///
/// Created once in `main`, shared behind an `Arc` between the Telegram
/// handlers (writer) and the health server (readers).
pub struct AppStats {
    started_at: DateTime<Utc>,
    requests_processed: AtomicU64,
}

impl AppStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            requests_processed: AtomicU64::new(0),
        }
    }

    /// Record one inbound download request. Returns the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Total requests processed since startup.
    pub fn requests_processed(&self) -> u64 {
        self.requests_processed.load(Ordering::Relaxed)
    }

    /// Moment the process started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed since startup.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// Uptime as a human-readable "1d 2h 3m 4s" string.
    pub fn uptime_human(&self) -> String {
        let secs = self.uptime().num_seconds().max(0);
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        if days > 0 {
            format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
        } else if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl Default for AppStats {
    fn default() -> Self {
        Self::new()
    }
}
