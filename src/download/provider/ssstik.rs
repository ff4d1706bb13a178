//! SsstikProvider — HTML form mirror service (first in the chain).
//!
//! Flow: priming GET to the landing page for a session cookie, then a
//! form-encoded POST to the processing endpoint. The response is an HTML
//! fragment; the download link is found by scanning anchors whose label
//! suggests a watermark-free download, falling back to a regex scan of
//! embedded script content for a direct `.mp4` URL.

use async_trait::async_trait;
use select::document::Document;
use select::predicate::Name;

use crate::core::config;
use crate::download::link::SourceLink;
use crate::download::provider::{is_plausible_media_url, scrape_client, Provider, ProviderResult, MEDIA_URL_RE};

/// Production endpoint of the service.
const DEFAULT_BASE_URL: &str = "https://ssstik.io";

/// Anchor labels that mark the watermark-free download button.
const DOWNLOAD_LABELS: &[&str] = &["download", "quality", "without watermark"];

/// Adapter for the ssstik.io form service.
pub struct SsstikProvider {
    client: reqwest::Client,
    base_url: String,
}

impl Default for SsstikProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SsstikProvider {
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

    /// Scan the response HTML for a download link.
    fn extract_media_url(body: &str) -> Option<String> {
        let document = Document::from(body);

        // Anchor whose visible label looks like the download button
        for anchor in document.find(Name("a")) {
            let Some(href) = anchor.attr("href") else { continue };
            let text = anchor.text().to_lowercase();
            if is_plausible_media_url(href) && DOWNLOAD_LABELS.iter().any(|label| text.contains(label)) {
                return Some(href.to_string());
            }
        }

        // Fall back to direct media URLs embedded in script content
        for script in document.find(Name("script")) {
            let script_text = script.text();
            if let Some(m) = MEDIA_URL_RE.find(&script_text) {
                return Some(m.as_str().to_string());
            }
        }

        None
    }
}

#[async_trait]
impl Provider for SsstikProvider {
    fn name(&self) -> &'static str {
        "ssstik"
    }

    async fn fetch_media_url(&self, link: &SourceLink) -> ProviderResult {
        // Priming request: the processing endpoint rejects sessions that
        // never loaded the landing page.
        self.client
            .get(format!("{}/", self.base_url))
            .header("Referer", format!("{}/", self.base_url))
            .timeout(config::network::prime_timeout())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| format!("ssstik: cannot reach landing page: {}", e))?;

        let response = self
            .client
            .post(format!("{}/abc", self.base_url))
            .header("Referer", format!("{}/", self.base_url))
            .header("Origin", self.base_url.as_str())
            .form(&[
                ("id", link.normalized.as_str()),
                ("locale", "en"),
                ("tt", "bWF2aWE="),
            ])
            .timeout(config::network::submit_timeout())
            .send()
            .await
            .map_err(|e| format!("ssstik: request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("ssstik: HTTP {}", response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("ssstik: failed to read response: {}", e))?;

        Self::extract_media_url(&body)
            .filter(|url| is_plausible_media_url(url))
            .ok_or_else(|| "ssstik: no download link in response".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_link() -> SourceLink {
        SourceLink {
            original: "https://www.tiktok.com/@user/video/123".to_string(),
            normalized: "https://www.tiktok.com/@user/video/123".to_string(),
        }
    }

    async fn mount_landing_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(server)
            .await;
    }

    #[test]
    fn test_extract_media_url_from_anchor() {
        let html = r#"<html><body>
            <a href="https://cdn.example.com/v">Watch online</a>
            <a href="https://cdn.example.com/v.mp4">Download without watermark</a>
        </body></html>"#;
        assert_eq!(
            SsstikProvider::extract_media_url(html),
            Some("https://cdn.example.com/v.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_media_url_ignores_relative_anchors() {
        let html = r#"<a href="/local/download">Download</a>"#;
        assert_eq!(SsstikProvider::extract_media_url(html), None);
    }

    #[test]
    fn test_extract_media_url_from_script() {
        let html = r#"<html><script>var src = "https://cdn.example.com/abc.mp4?tk=1";</script></html>"#;
        assert_eq!(
            SsstikProvider::extract_media_url(html),
            Some("https://cdn.example.com/abc.mp4?tk=1".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_media_url_success() {
        let server = MockServer::start().await;
        mount_landing_page(&server).await;

        Mock::given(method("POST"))
            .and(path("/abc"))
            .and(body_string_contains("tiktok.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div><a href="https://cdn.example.com/v.mp4" class="download_link">Download Server 1 (HD quality)</a></div>"#,
            ))
            .mount(&server)
            .await;

        let provider = SsstikProvider::with_base_url(server.uri());
        let result = provider.fetch_media_url(&test_link()).await;

        assert_eq!(result, Ok("https://cdn.example.com/v.mp4".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_media_url_no_link_in_body() {
        let server = MockServer::start().await;
        mount_landing_page(&server).await;

        Mock::given(method("POST"))
            .and(path("/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div>Video is private</div>"))
            .mount(&server)
            .await;

        let provider = SsstikProvider::with_base_url(server.uri());
        let result = provider.fetch_media_url(&test_link()).await;

        assert_eq!(result, Err("ssstik: no download link in response".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_media_url_landing_page_down() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = SsstikProvider::with_base_url(server.uri());
        let err = provider.fetch_media_url(&test_link()).await.unwrap_err();

        assert!(err.starts_with("ssstik: cannot reach landing page"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_fetch_media_url_bad_status() {
        let server = MockServer::start().await;
        mount_landing_page(&server).await;

        Mock::given(method("POST"))
            .and(path("/abc"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = SsstikProvider::with_base_url(server.uri());
        let err = provider.fetch_media_url(&test_link()).await.unwrap_err();

        assert!(err.contains("429"), "got: {}", err);
    }
}
