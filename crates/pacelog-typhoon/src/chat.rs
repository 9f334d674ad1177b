// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Typhoon chat completion endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use pacelog_core::{ChatMessage, ChatPort, PacelogError};

use crate::types::{ChatRequest, ChatResponse};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.1;

/// HTTP client for Typhoon chat completions.
#[derive(Debug, Clone)]
pub struct TyphoonChatClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl TyphoonChatClient {
    /// Creates a new chat client.
    ///
    /// # Arguments
    /// * `api_key` - Typhoon API key for bearer authentication
    /// * `base_url` - API base (e.g., "https://api.opentyphoon.ai")
    /// * `model` - chat model identifier
    /// * `timeout` - per-request timeout
    pub fn new(
        api_key: &str,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, PacelogError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| PacelogError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PacelogError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            model,
        })
    }
}

#[async_trait]
impl ChatPort for TyphoonChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PacelogError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PacelogError::Provider {
                message: format!("chat request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "chat completion response received");

        if status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(PacelogError::RateLimited(format!(
                "chat API rate limit reached: {body}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PacelogError::Provider {
                message: format!("chat API returned {status}: {body}"),
                source: None,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| PacelogError::Provider {
            message: format!("failed to parse chat response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| PacelogError::Provider {
                message: "chat response contained no choices".into(),
                source: None,
            })?;
        Ok(content)
    }
}
