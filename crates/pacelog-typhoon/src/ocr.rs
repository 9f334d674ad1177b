// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Typhoon OCR endpoint.
//!
//! Sends a pre-processed image as a multipart upload and flattens the
//! per-page results into a single text block for downstream extraction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use pacelog_core::{OcrPort, PacelogError};

use crate::types::{NaturalTextEnvelope, OcrResponse};

/// HTTP client for Typhoon OCR communication.
#[derive(Debug, Clone)]
pub struct TyphoonOcrClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl TyphoonOcrClient {
    /// Creates a new OCR client.
    ///
    /// # Arguments
    /// * `api_key` - Typhoon API key for bearer authentication
    /// * `base_url` - API base (e.g., "https://api.opentyphoon.ai")
    /// * `model` - OCR model identifier
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
impl OcrPort for TyphoonOcrClient {
    async fn extract_text(
        &self,
        image: &[u8],
        filename_hint: &str,
    ) -> Result<String, PacelogError> {
        let part = Part::bytes(image.to_vec())
            .file_name(filename_hint.to_string())
            .mime_str("image/png")
            .map_err(|e| PacelogError::Provider {
                message: format!("failed to build multipart body: {e}"),
                source: Some(Box::new(e)),
            })?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("task_type", "default")
            .text("max_tokens", "1000")
            .text("temperature", "0.1")
            .text("top_p", "0.6")
            .text("repetition_penalty", "1.2");

        let url = format!("{}/v1/ocr", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PacelogError::Provider {
                message: format!("OCR request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PacelogError::Provider {
                message: format!("OCR API returned {status}: {body}"),
                source: None,
            });
        }

        let body: OcrResponse = response.json().await.map_err(|e| PacelogError::Provider {
            message: format!("failed to parse OCR response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut pages = Vec::new();
        for result in &body.results {
            if !result.success {
                warn!("skipping unsuccessful OCR page");
                continue;
            }
            let Some(message) = &result.message else {
                continue;
            };
            let Some(choice) = message.choices.first() else {
                continue;
            };
            pages.push(unwrap_natural_text(&choice.message.content));
        }

        let text = pages.join("\n");
        debug!(pages = pages.len(), chars = text.len(), "OCR text assembled");
        Ok(text)
    }
}

/// Unwraps the `natural_text` field when the page content is a JSON envelope;
/// otherwise returns the content verbatim.
fn unwrap_natural_text(content: &str) -> String {
    match serde_json::from_str::<NaturalTextEnvelope>(content) {
        Ok(envelope) => envelope.natural_text,
        Err(_) => content.to_string(),
    }
}
