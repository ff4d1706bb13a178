//! TikmateProvider — JSON lookup API (second in the chain).
//!
//! Single JSON POST to the lookup endpoint. The response schema drifts
//! between deployments, so the video URL is looked up under every key name
//! the service has been seen using, including nested under `result`.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::config;
use crate::download::link::SourceLink;
use crate::download::provider::{is_plausible_media_url, scrape_client, Provider, ProviderResult};

/// Production endpoint of the service.
const DEFAULT_BASE_URL: &str = "https://tikmate.app";

/// Adapter for the tikmate.app JSON API.
pub struct TikmateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl Default for TikmateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TikmateProvider {
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

    /// Dig the video URL out of the response under its known alternative keys.
    fn extract_video_url(data: &Value) -> Option<String> {
        let candidate = if data.get("success").and_then(Value::as_bool) == Some(true)
            && data.get("video_url").and_then(Value::as_str).is_some()
        {
            data.get("video_url").and_then(Value::as_str)
        } else {
            data.get("videoUrl")
                .and_then(Value::as_str)
                .or_else(|| data.get("url").and_then(Value::as_str))
                .or_else(|| {
                    let result = data.get("result")?;
                    result
                        .get("video_url")
                        .and_then(Value::as_str)
                        .or_else(|| result.get("videoUrl").and_then(Value::as_str))
                })
        };

        candidate
            .filter(|url| is_plausible_media_url(url))
            .map(str::to_string)
    }
}

#[async_trait]
impl Provider for TikmateProvider {
    fn name(&self) -> &'static str {
        "tikmate"
    }

    async fn fetch_media_url(&self, link: &SourceLink) -> ProviderResult {
        let response = self
            .client
            .post(format!("{}/api/lookup", self.base_url))
            .header("Referer", format!("{}/", self.base_url))
            .header("Origin", self.base_url.as_str())
            .header("Accept", "application/json, text/plain, */*")
            .json(&serde_json::json!({ "url": link.normalized }))
            .timeout(config::network::submit_timeout())
            .send()
            .await
            .map_err(|e| format!("tikmate: request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("tikmate: HTTP {}", response.status()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("tikmate: JSON decode error: {}", e))?;

        Self::extract_video_url(&data).ok_or_else(|| "tikmate: no video in response".to_string())
    }
}
