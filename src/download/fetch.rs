//! Size-capped media download.
//!
//! Streams the resolved media URL into memory chunk by chunk, checking the
//! cumulative size against the cap on every chunk. An oversize video aborts
//! the transfer immediately — the full body is never materialized first.

use futures_util::StreamExt;
use reqwest::Client;
use thiserror::Error;

use crate::core::config;

/// Downloaded media, ready to be handed to the chat front-end.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub data: Vec<u8>,
    pub file_name: String,
}

impl MediaBlob {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Errors from the media fetch stage.
///
/// `TooLarge` is distinct from transport failures so the front-end can show
/// the user a dedicated message instead of a generic download error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("media exceeds the {max_bytes} byte limit")]
    TooLarge { max_bytes: u64 },

    #[error("HTTP request failed with status: {0}")]
    BadStatus(reqwest::StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Build the HTTP client used for media downloads.
pub fn fetch_client() -> Client {
    Client::builder()
        .user_agent(config::USER_AGENT)
        .timeout(config::network::fetch_timeout())
        .connect_timeout(std::time::Duration::from_secs(15))
        .build()
        .expect("fetch HTTP client build should succeed")
}

/// Stream `media_url` into memory, aborting once `max_bytes` is exceeded.
pub async fn fetch_media(client: &Client, media_url: &str, max_bytes: u64) -> Result<MediaBlob, FetchError> {
    let response = client.get(media_url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::BadStatus(response.status()));
    }

    // Reject early when the server already declares an oversize body.
    if let Some(declared) = response.content_length() {
        if declared > max_bytes {
            return Err(FetchError::TooLarge { max_bytes });
        }
    }

    let mut data: Vec<u8> = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if data.len() as u64 + chunk.len() as u64 > max_bytes {
            return Err(FetchError::TooLarge { max_bytes });
        }
        data.extend_from_slice(&chunk);
    }

    log::info!(
        "📥 Media download complete: {:.2} MB",
        data.len() as f64 / (1024.0 * 1024.0)
    );

    Ok(MediaBlob {
        data,
        file_name: config::download::VIDEO_FILE_NAME.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_media_success() {
        let server = MockServer::start().await;
        let body = vec![0x42u8; 1024];

        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let client = fetch_client();
        let blob = fetch_media(&client, &format!("{}/v.mp4", server.uri()), 10_000)
            .await
            .unwrap();

        assert_eq!(blob.data, body);
        assert_eq!(blob.size(), 1024);
        assert_eq!(blob.file_name, config::download::VIDEO_FILE_NAME);
    }

    #[tokio::test]
    async fn test_fetch_media_too_large_aborts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/big.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
            .mount(&server)
            .await;

        let client = fetch_client();
        let err = fetch_media(&client, &format!("{}/big.mp4", server.uri()), 1000)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::TooLarge { max_bytes: 1000 }));
    }

    #[tokio::test]
    async fn test_fetch_media_exactly_at_cap_is_allowed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1000]))
            .mount(&server)
            .await;

        let client = fetch_client();
        let blob = fetch_media(&client, &format!("{}/v.mp4", server.uri()), 1000)
            .await
            .unwrap();

        assert_eq!(blob.size(), 1000);
    }

    #[tokio::test]
    async fn test_fetch_media_bad_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gone.mp4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = fetch_client();
        let err = fetch_media(&client, &format!("{}/gone.mp4", server.uri()), 10_000)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::BadStatus(code) if code.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_fetch_media_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = fetch_client();
        let err = fetch_media(&client, &format!("http://127.0.0.1:{}/v.mp4", port), 10_000)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }
}
