//! TikTok link normalization.
//!
//! Strips tracking query strings, validates the host against the supported
//! domain set, and expands `vm.`/`vt.` short links by following redirects.
//! Short-link resolution is best-effort: on any failure the original link
//! is kept, never an error.

use reqwest::Client;

use crate::core::config;

/// Host substrings the bot accepts. Everything else is rejected up front.
const ACCEPTED_HOSTS: &[&str] = &["tiktok.com", "douyin.com"];

/// Short-link hosts that need a redirect-resolution pass before scraping.
const SHORT_LINK_HOSTS: &[&str] = &["vm.tiktok.com", "vt.tiktok.com"];

/// A user-supplied link after normalization.
///
/// Created per inbound message, handed to the fallback chain, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    /// The raw text the user sent.
    pub original: String,
    /// Scheme + host + path with the query string removed.
    pub normalized: String,
}

/// Strip the query string and validate the host.
///
/// Returns `None` for empty input or links outside the supported domains.
pub fn clean_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let stripped = match raw.find('?') {
        Some(pos) => &raw[..pos],
        None => raw,
    };

    if ACCEPTED_HOSTS.iter().any(|host| stripped.contains(host)) {
        Some(stripped.to_string())
    } else {
        None
    }
}

/// Whether the link uses one of the known short-link subdomains.
pub fn is_short_link(url: &str) -> bool {
    SHORT_LINK_HOSTS.iter().any(|host| url.contains(host))
}

/// Follow redirects on a short link and return the final URL.
///
/// Returns `None` on any failure (timeout, DNS, non-redirecting response
/// chain that errors out) so the caller can keep the original link.
pub async fn resolve_short_url(client: &Client, short_url: &str) -> Option<String> {
    let response = client
        .head(short_url)
        .timeout(config::network::short_link_timeout())
        .send()
        .await
        .map_err(|e| log::warn!("Error resolving short URL {}: {}", short_url, e))
        .ok()?;

    Some(response.url().to_string())
}

/// Normalize a raw user link into a [`SourceLink`].
///
/// Short links are expanded first (best-effort), then the query string is
/// stripped from whatever URL we ended up with. Returns `None` when the
/// link is empty or not a supported TikTok/Douyin URL.
pub async fn normalize(client: &Client, raw: &str) -> Option<SourceLink> {
    let mut url = clean_url(raw)?;

    if is_short_link(&url) {
        log::info!("Resolving short link: {}", url);
        if let Some(full_url) = resolve_short_url(client, &url).await {
            // The redirect target carries its own tracking params; strip again.
            // If the target somehow left the supported domains, keep the original.
            if let Some(cleaned) = clean_url(&full_url) {
                log::info!("Short link resolved to: {}", cleaned);
                url = cleaned;
            }
        }
    }

    Some(SourceLink {
        original: raw.trim().to_string(),
        normalized: url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_clean_url_strips_query() {
        assert_eq!(
            clean_url("https://www.tiktok.com/@user/video/123?is_from_webapp=1&lang=en"),
            Some("https://www.tiktok.com/@user/video/123".to_string())
        );
    }

    #[test]
    fn test_clean_url_keeps_bare_link() {
        assert_eq!(
            clean_url("https://www.tiktok.com/@user/video/123"),
            Some("https://www.tiktok.com/@user/video/123".to_string())
        );
    }

    #[test]
    fn test_clean_url_accepts_douyin() {
        assert_eq!(
            clean_url("https://www.douyin.com/video/456?x=1"),
            Some("https://www.douyin.com/video/456".to_string())
        );
    }

    #[test]
    fn test_clean_url_rejects_foreign_host() {
        assert_eq!(clean_url("https://example.com/x"), None);
        assert_eq!(clean_url("https://www.youtube.com/watch?v=abc"), None);
    }

    #[test]
    fn test_clean_url_rejects_empty() {
        assert_eq!(clean_url(""), None);
        assert_eq!(clean_url("   "), None);
    }

    #[test]
    fn test_is_short_link() {
        assert!(is_short_link("https://vm.tiktok.com/ab12"));
        assert!(is_short_link("https://vt.tiktok.com/ZSabc/"));
        assert!(!is_short_link("https://www.tiktok.com/@user/video/123"));
    }

    #[tokio::test]
    async fn test_resolve_short_url_follows_redirect() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/short"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", format!("{}/full", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/full"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let resolved = resolve_short_url(&client, &format!("{}/short", mock_server.uri())).await;

        assert_eq!(resolved, Some(format!("{}/full", mock_server.uri())));
    }

    #[tokio::test]
    async fn test_resolve_short_url_failure_returns_none() {
        // Bind a listener, grab the port, drop it — connecting gets refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new();
        let resolved = resolve_short_url(&client, &format!("http://127.0.0.1:{}/short", port)).await;

        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_normalize_full_link() {
        let client = Client::new();
        let link = normalize(&client, "https://www.tiktok.com/@user/video/999?x=1")
            .await
            .unwrap();

        assert_eq!(link.normalized, "https://www.tiktok.com/@user/video/999");
        assert_eq!(link.original, "https://www.tiktok.com/@user/video/999?x=1");
    }

    #[tokio::test]
    async fn test_normalize_keeps_short_link_when_resolution_fails() {
        // Route everything through a dead proxy so the redirect resolution
        // fails deterministically; the original link must survive untouched.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::builder()
            .proxy(reqwest::Proxy::all(format!("http://127.0.0.1:{}", port)).unwrap())
            .build()
            .unwrap();

        let link = normalize(&client, "https://vm.tiktok.com/ab12?x=1").await.unwrap();

        assert_eq!(link.normalized, "https://vm.tiktok.com/ab12");
        assert_eq!(link.original, "https://vm.tiktok.com/ab12?x=1");
    }

    #[tokio::test]
    async fn test_normalize_rejects_unsupported() {
        let client = Client::new();
        assert!(normalize(&client, "https://example.com/x").await.is_none());
        assert!(normalize(&client, "").await.is_none());
    }
}
