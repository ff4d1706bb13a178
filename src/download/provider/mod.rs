//! Third-party mirror service adapters.
//!
//! Each provider wraps one external downloader site and extracts a direct
//! media URL from its HTML or JSON response. The wire contracts are owned
//! by third parties and break without notice — each adapter keeps its
//! fragile parsing heuristics behind the common [`Provider`] trait so they
//! can be swapped or mocked independently.
//!
//! Built-in providers, in chain order:
//! - `SsstikProvider` — HTML form service, anchor scan + script regex
//! - `TikmateProvider` — JSON lookup API
//! - `SnaptikProvider` — hidden-token form service, anchor scan

pub mod snaptik;
pub mod ssstik;
pub mod tikmate;

pub use snaptik::SnaptikProvider;
pub use ssstik::SsstikProvider;
pub use tikmate::TikmateProvider;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::download::link::SourceLink;

/// Outcome of one adapter invocation: a direct media URL, or a free-text
/// failure reason naming the provider and the underlying cause.
pub type ProviderResult = Result<String, String>;

/// A third-party downloader service adapter.
///
/// One HTTP request/response cycle per call; no internal retries. Transport
/// errors are caught and folded into the failure reason, never propagated.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable service name used in logs and failure reasons.
    fn name(&self) -> &'static str;

    /// Submit the link to the service and extract a direct media URL.
    async fn fetch_media_url(&self, link: &SourceLink) -> ProviderResult;
}

/// Direct video URL embedded in script content, e.g.
/// `https://cdn.example.com/v.mp4?tk=abc`.
pub(crate) static MEDIA_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(https?://[^\s"'<>]+\.mp4[^\s"'<>]*)"#).expect("media URL regex is valid"));

/// Build the scraping HTTP client shared by provider constructors.
///
/// Browser-like user agent and bounded timeouts; each request additionally
/// sets its own per-phase timeout.
pub(crate) fn scrape_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(crate::core::config::USER_AGENT)
        .timeout(crate::core::config::network::submit_timeout())
        .connect_timeout(std::time::Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .expect("scrape HTTP client build should succeed")
}

/// First anchor candidate that actually points somewhere downloadable.
pub(crate) fn is_plausible_media_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}
