//! Fallback chain over the mirror services.
//!
//! Providers are tried in a fixed priority order and the chain
//! short-circuits on the first usable URL. Between failed attempts a small
//! randomized delay keeps us polite towards the mirrors. Nothing persists
//! across invocations — no circuit breaker, no success affinity.

use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config;
use crate::download::link::{self, SourceLink};
use crate::download::provider::{Provider, SnaptikProvider, SsstikProvider, TikmateProvider};

/// Final state of one orchestration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A provider produced a direct media URL.
    Resolved(String),
    /// Every provider failed; reasons in call order.
    Exhausted(Vec<String>),
}

/// Sequential fallback orchestrator: normalize, then walk the provider
/// chain until one yields a direct media URL.
pub struct Resolver {
    client: reqwest::Client,
    providers: Vec<Arc<dyn Provider>>,
    attempt_delay_ms: RangeInclusive<u64>,
}

impl Resolver {
    /// Production chain: ssstik, then tikmate, then snaptik.
    /// Earlier providers have proven more reliable; order matters.
    pub fn new() -> Self {
        Self::with_providers(
            vec![
                Arc::new(SsstikProvider::new()),
                Arc::new(TikmateProvider::new()),
                Arc::new(SnaptikProvider::new()),
            ],
            config::resolver::ATTEMPT_DELAY_MIN_MS..=config::resolver::ATTEMPT_DELAY_MAX_MS,
        )
    }

    /// Build a resolver with an explicit chain and inter-attempt delay
    /// range. Tests use mock providers and a zero delay.
    pub fn with_providers(providers: Vec<Arc<dyn Provider>>, attempt_delay_ms: RangeInclusive<u64>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config::USER_AGENT)
            .timeout(config::network::short_link_timeout())
            .build()
            .expect("resolver HTTP client build should succeed");

        Self {
            client,
            providers,
            attempt_delay_ms,
        }
    }

    /// Resolve a raw user link to a direct media URL via the fallback chain.
    pub async fn resolve(&self, raw: &str) -> DownloadOutcome {
        let Some(source_link) = link::normalize(&self.client, raw).await else {
            return DownloadOutcome::Exhausted(vec!["invalid url".to_string()]);
        };

        let mut reasons = Vec::with_capacity(self.providers.len());

        for (i, provider) in self.providers.iter().enumerate() {
            log::info!("Trying {} for {}", provider.name(), source_link.normalized);

            match provider.fetch_media_url(&source_link).await {
                Ok(media_url) => {
                    log::info!("✅ {} resolved the video", provider.name());
                    return DownloadOutcome::Resolved(media_url);
                }
                Err(reason) => {
                    log::warn!("❌ {} failed: {}", provider.name(), reason);
                    reasons.push(reason);
                }
            }

            // Politeness delay before the next mirror; pointless after the last one.
            if i + 1 < self.providers.len() {
                tokio::time::sleep(self.sample_delay()).await;
            }
        }

        DownloadOutcome::Exhausted(reasons)
    }

    fn sample_delay(&self) -> Duration {
        if self.attempt_delay_ms.is_empty() || *self.attempt_delay_ms.end() == 0 {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(self.attempt_delay_ms.clone());
        Duration::from_millis(ms)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
