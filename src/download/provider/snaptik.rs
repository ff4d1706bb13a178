//! SnaptikProvider — hidden-token form service (last in the chain).
//!
//! Flow: GET the landing page, scrape the hidden `token` input, POST the
//! link + token as a form, scan response anchors for a download/server
//! button.

use async_trait::async_trait;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};

use crate::core::config;
use crate::download::link::SourceLink;
use crate::download::provider::{is_plausible_media_url, scrape_client, Provider, ProviderResult};

/// Production endpoint of the service.
const DEFAULT_BASE_URL: &str = "https://snaptik.app";

/// Anchor labels that mark the download buttons on the result page.
const DOWNLOAD_LABELS: &[&str] = &["download", "server"];

/// Adapter for the snaptik.app form service.
pub struct SnaptikProvider {
    client: reqwest::Client,
    base_url: String,
}

impl Default for SnaptikProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SnaptikProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the adapter at a different endpoint (fixture servers in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: scrape_client(),
            base_url: base_url.into(),
        }
    }

    /// Scrape the anti-CSRF token from the landing page.
    ///
    /// Prefers `<input name="token">`; some deployments rename the field,
    /// so any hidden input is accepted as a fallback. Empty string when the
    /// page carries no token at all — the POST is attempted regardless.
    fn extract_token(body: &str) -> String {
        let document = Document::from(body);

        document
            .find(Name("input").and(Attr("name", "token")))
            .next()
            .or_else(|| document.find(Name("input").and(Attr("type", "hidden"))).next())
            .and_then(|input| input.attr("value"))
            .unwrap_or_default()
            .to_string()
    }

    /// Scan the result page for a download anchor.
    fn extract_media_url(body: &str) -> Option<String> {
        let document = Document::from(body);

        for anchor in document.find(Name("a")) {
            let Some(href) = anchor.attr("href") else { continue };
            let text = anchor.text().to_lowercase();
            if is_plausible_media_url(href) && DOWNLOAD_LABELS.iter().any(|label| text.contains(label)) {
                return Some(href.to_string());
            }
        }

        None
    }
}

#[async_trait]
impl Provider for SnaptikProvider {
    fn name(&self) -> &'static str {
        "snaptik"
    }

    async fn fetch_media_url(&self, link: &SourceLink) -> ProviderResult {
        let home = self
            .client
            .get(format!("{}/", self.base_url))
            .header("Referer", format!("{}/", self.base_url))
            .timeout(config::network::prime_timeout())
            .send()
            .await
            .map_err(|e| format!("snaptik: cannot reach landing page: {}", e))?
            .text()
            .await
            .map_err(|e| format!("snaptik: failed to read landing page: {}", e))?;

        let token = Self::extract_token(&home);

        let response = self
            .client
            .post(format!("{}/abc2.php", self.base_url))
            .header("Referer", format!("{}/", self.base_url))
            .header("Origin", self.base_url.as_str())
            .form(&[("url", link.normalized.as_str()), ("token", token.as_str())])
            .timeout(config::network::submit_timeout())
            .send()
            .await
            .map_err(|e| format!("snaptik: request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("snaptik: HTTP {}", response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("snaptik: failed to read response: {}", e))?;

        Self::extract_media_url(&body)
            .filter(|url| is_plausible_media_url(url))
            .ok_or_else(|| "snaptik: no download link in response".to_string())
    }
}
