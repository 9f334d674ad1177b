// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! The webhook contract is verify-then-acknowledge: the signature is checked
//! against the raw body, the delivery is acknowledged with 200 immediately,
//! and each event is processed in its own spawned task. LINE retries
//! deliveries that do not get a timely 2xx, so processing must never sit in
//! front of the acknowledgement.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pacelog_core::types::InboundEvent;
use pacelog_line::{SIGNATURE_HEADER, verify_signature};

use crate::server::GatewayState;

/// Webhook request body: a batch of platform events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

/// Acknowledgement body for POST /webhook.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
}

/// POST /webhook
///
/// Verifies the platform signature over the raw body, acknowledges, and
/// spawns per-event processing.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_signature(&state.channel_secret, &body, signature) {
        warn!("webhook signature verification failed");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid signature".to_string(),
            }),
        )
            .into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "webhook body rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("malformed webhook body: {err}"),
                }),
            )
                .into_response();
        }
    };

    debug!(events = payload.events.len(), "webhook delivery accepted");
    for event in payload.events {
        let pipeline = state.pipeline.clone();
        // Each event gets its own task so one slow image cannot starve the
        // rest of the batch; handle_event contains its own error boundary.
        tokio::spawn(async move {
            pipeline.handle_event(event).await;
        });
    }

    (StatusCode::OK, Json(StatusResponse { status: "ok" })).into_response()
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
