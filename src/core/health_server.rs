//! Liveness HTTP server for uptime monitors.
//!
//! Runs on PORT (default 5000) on its own task so a slow download never
//! starves a health probe. Read-only, no authentication:
//! - `/`       — JSON status object
//! - `/health` — plain "OK"
//! - `/ping`   — plain "pong"

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::stats::AppStats;

/// Build the liveness router. Exposed separately from [`start_health_server`]
/// so tests can serve it on an ephemeral port.
pub fn health_router(stats: Arc<AppStats>) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .with_state(stats)
}

/// Start the liveness server.
pub async fn start_health_server(port: u16, stats: Arc<AppStats>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = health_router(stats);

    log::info!("Starting health check server on http://{}", addr);
    log::info!("  /        - Status (JSON)");
    log::info!("  /health  - Health check");
    log::info!("  /ping    - Ping for uptime monitoring");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET / — JSON status object with uptime and request count.
async fn status_handler(State(stats): State<Arc<AppStats>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "bot": "TikTok Downloader Bot",
        "uptime": stats.uptime_human(),
        "requests_processed": stats.requests_processed(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /health — plain health check for container orchestrators.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /ping — literal "pong" for uptime monitors.
async fn ping_handler() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serve the router on an ephemeral port and return its base URL.
    async fn spawn_server(stats: Arc<AppStats>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, health_router(stats)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let base = spawn_server(Arc::new(AppStats::new())).await;
        let resp = reqwest::get(format!("{}/ping", base)).await.unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let base = spawn_server(Arc::new(AppStats::new())).await;
        let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_status_reports_request_count() {
        let stats = Arc::new(AppStats::new());
        stats.record_request();
        stats.record_request();

        let base = spawn_server(Arc::clone(&stats)).await;
        let body: serde_json::Value = reqwest::get(format!("{}/", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["requests_processed"], 2);
        assert!(body["uptime"].as_str().is_some());
        assert!(body["timestamp"].as_str().is_some());
    }
}
