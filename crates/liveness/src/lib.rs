//! Plain-text liveness endpoint for hosting platforms that poll for health.
//!
//! Runs alongside the relay and shares nothing with it. A failed bind is
//! logged and the relay keeps going without the endpoint.

use std::net::SocketAddr;

use {
    axum::{Router, routing::get},
    kyron_config::LivenessConfig,
    tokio::{net::TcpListener, task::JoinHandle},
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

pub const ROOT_BODY: &str = "Bot is running";
pub const HEALTH_BODY: &str = "OK";

/// Build the liveness router (shared between startup and tests).
pub fn build_app() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> &'static str {
    ROOT_BODY
}

async fn health_handler() -> &'static str {
    HEALTH_BODY
}

/// Serve on an already-bound listener until `cancel` fires.
pub async fn serve(listener: TcpListener, cancel: CancellationToken) -> std::io::Result<()> {
    axum::serve(listener, build_app())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}

/// Bind `config.bind:config.port` and serve in the background.
///
/// Bind and serve errors are logged, never propagated.
pub fn spawn(config: &LivenessConfig, cancel: CancellationToken) -> JoinHandle<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                warn!(%addr, error = %e, "liveness endpoint disabled: bind failed");
                return;
            },
        };
        let local = listener
            .local_addr()
            .map_or_else(|_| addr.clone(), |a: SocketAddr| a.to_string());
        info!(addr = %local, "liveness endpoint listening");

        if let Err(e) = serve(listener, cancel).await {
            warn!(addr = %local, error = %e, "liveness endpoint stopped");
        }
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn start() -> (SocketAddr, CancellationToken, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let cancel = cancel.clone();
            async move { serve(listener, cancel).await.unwrap() }
        });
        (addr, cancel, handle)
    }

    #[tokio::test]
    async fn root_and_health_answer_plain_text() {
        let (addr, cancel, handle) = start().await;

        let root = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(root.status(), 200);
        let content_type = root.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(root.text().await.unwrap(), "Bot is running");

        let health = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "OK");

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (addr, cancel, handle) = start().await;
        let resp = reqwest::get(format!("http://{addr}/status")).await.unwrap();
        assert_eq!(resp.status(), 404);
        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn bind_failure_is_not_fatal() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = LivenessConfig {
            enabled: true,
            bind: "127.0.0.1".into(),
            port,
        };

        // Returns on its own instead of panicking or hanging.
        spawn(&config, CancellationToken::new()).await.unwrap();
        drop(taken);
    }
}
