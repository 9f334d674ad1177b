// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use pacelog_config::model::GatewayConfig;
use pacelog_core::PacelogError;
use pacelog_pipeline::Pipeline;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Event pipeline; one instance serves all requests.
    pub pipeline: Arc<Pipeline>,
    /// Channel secret for webhook signature verification.
    pub channel_secret: String,
}

/// Builds the gateway router.
///
/// - POST /webhook (signature-verified)
/// - GET /health (public)
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server. Runs until SIGINT, then drains in-flight
/// requests before returning.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), PacelogError> {
    start_server_with_shutdown(config, state, shutdown_signal()).await
}

/// Like [`start_server`], but stops when `shutdown` resolves.
pub async fn start_server_with_shutdown(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), PacelogError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PacelogError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PacelogError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => tracing::error!(error = %err, "failed to listen for shutdown signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use pacelog_config::model::PipelineConfig;
    use pacelog_line::sign;
    use pacelog_test_utils::{MockChat, MockMessaging, MockOcr, MockStore};

    const SECRET: &str = "test-channel-secret";

    fn test_state(channel: Arc<MockMessaging>) -> GatewayState {
        let pipeline = Pipeline::new(
            channel,
            Arc::new(MockOcr::new("")),
            Arc::new(MockChat::new("0")),
            Arc::new(MockStore::new()),
            &PipelineConfig::default(),
        );
        GatewayState {
            pipeline: Arc::new(pipeline),
            channel_secret: SECRET.to_string(),
        }
    }

    fn webhook_request(body: &str, signature: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("x-line-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_router(test_state(Arc::new(MockMessaging::new())));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_rejects_bad_signature() {
        let app = build_router(test_state(Arc::new(MockMessaging::new())));
        let response = app
            .oneshot(webhook_request(r#"{"events": []}"#, "bm90LXZhbGlk"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn webhook_rejects_missing_signature() {
        let app = build_router(test_state(Arc::new(MockMessaging::new())));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"events": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_body_after_valid_signature() {
        let app = build_router(test_state(Arc::new(MockMessaging::new())));
        let body = "not json";
        let response = app
            .oneshot(webhook_request(body, &sign(SECRET, body.as_bytes())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_acknowledges_and_processes_in_background() {
        let channel = Arc::new(MockMessaging::new());
        let app = build_router(test_state(channel.clone()));

        let body = r#"{"events": [{
            "type": "message",
            "replyToken": "rt-1",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "text", "text": "hi"}
        }]}"#;
        let response = app
            .oneshot(webhook_request(body, &sign(SECRET, body.as_bytes())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Processing runs in a spawned task after the acknowledgement.
        let mut replied = false;
        for _ in 0..50 {
            if !channel.replies().await.is_empty() {
                replied = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(replied, "text event should produce an instructional reply");
    }

    #[tokio::test]
    async fn webhook_acknowledges_before_slow_download_finishes() {
        let channel = Arc::new(MockMessaging::new());
        channel.delay_content(Duration::from_secs(5));
        let app = build_router(test_state(channel.clone()));

        let body = r#"{"events": [{
            "type": "message",
            "replyToken": "rt-1",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "image", "id": "m-1"}
        }]}"#;
        let started = std::time::Instant::now();
        let response = app
            .oneshot(webhook_request(body, &sign(SECRET, body.as_bytes())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "acknowledgement must not wait for event processing"
        );
        // The content download is still pending, so no outcome yet.
        assert!(channel.pushes().await.is_empty());
    }

    #[tokio::test]
    async fn server_drains_and_stops_when_shutdown_resolves() {
        let config = GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let state = test_state(Arc::new(MockMessaging::new()));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            start_server_with_shutdown(&config, state, async {
                let _ = rx.await;
            })
            .await
        });

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server should stop after the shutdown future resolves")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn webhook_accepts_empty_event_batch() {
        let app = build_router(test_state(Arc::new(MockMessaging::new())));
        let body = r#"{"destination": "U000", "events": []}"#;
        let response = app
            .oneshot(webhook_request(body, &sign(SECRET, body.as_bytes())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
