// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the LINE Messaging API.
//!
//! Covers the four capabilities the pipeline needs: reply, push, profile
//! lookup, and message-content download. One client instance is constructed
//! at startup and shared by reference; reqwest pools connections internally.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pacelog_core::{MessagingPort, PacelogError};

/// HTTP client for LINE Messaging API communication.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: reqwest::Client,
    api_base_url: String,
    data_base_url: String,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    fn new(text: &'a str) -> Self {
        Self { kind: "text", text }
    }
}

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl LineClient {
    /// Creates a new Messaging API client.
    ///
    /// # Arguments
    /// * `channel_access_token` - long-lived channel access token
    /// * `api_base_url` - Messaging API base (reply/push/profile)
    /// * `data_base_url` - content API base (binary downloads)
    pub fn new(
        channel_access_token: &str,
        api_base_url: String,
        data_base_url: String,
    ) -> Result<Self, PacelogError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {channel_access_token}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| PacelogError::Config(format!("invalid channel access token: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PacelogError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base_url,
            data_base_url,
        })
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<(), PacelogError> {
        let url = format!("{}{}", self.api_base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PacelogError::Channel {
                message: format!("HTTP request to {path} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(%path, status = %status, "LINE API call succeeded");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PacelogError::Channel {
            message: format!("LINE API {path} returned {status}: {body}"),
            source: None,
        })
    }
}

#[async_trait]
impl MessagingPort for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), PacelogError> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![TextMessage::new(text)],
        };
        self.post_json("/v2/bot/message/reply", &request).await
    }

    async fn push(&self, user_id: &str, text: &str) -> Result<(), PacelogError> {
        let request = PushRequest {
            to: user_id,
            messages: vec![TextMessage::new(text)],
        };
        self.post_json("/v2/bot/message/push", &request).await
    }

    async fn fetch_display_name(&self, user_id: &str) -> Result<String, PacelogError> {
        let url = format!("{}/v2/bot/profile/{user_id}", self.api_base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PacelogError::Channel {
                message: format!("profile fetch failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PacelogError::Channel {
                message: format!("profile API returned {status}: {body}"),
                source: None,
            });
        }

        let profile: ProfileResponse =
            response.json().await.map_err(|e| PacelogError::Channel {
                message: format!("failed to parse profile response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(profile.display_name)
    }

    async fn fetch_message_content(&self, message_id: &str) -> Result<Vec<u8>, PacelogError> {
        let url = format!(
            "{}/v2/bot/message/{message_id}/content",
            self.data_base_url
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PacelogError::Channel {
                message: format!("content download failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PacelogError::Channel {
                message: format!("content API returned {status}: {body}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| PacelogError::Channel {
            message: format!("failed to read content body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(message_id, size = bytes.len(), "message content downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> LineClient {
        LineClient::new("test-token", base_url.to_string(), base_url.to_string()).unwrap()
    }

    #[tokio::test]
    async fn reply_posts_token_and_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "replyToken": "rt-1",
                "messages": [{"type": "text", "text": "processing"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.reply("rt-1", "processing").await.unwrap();
    }

    #[tokio::test]
    async fn push_posts_recipient_and_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(body_json(serde_json::json!({
                "to": "U123",
                "messages": [{"type": "text", "text": "done"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.push("U123", "done").await.unwrap();
    }

    #[tokio::test]
    async fn reply_error_status_surfaces_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "Invalid reply token"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.reply("stale", "x").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("Invalid reply token"), "got: {msg}");
    }

    #[tokio::test]
    async fn fetch_display_name_parses_profile() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/bot/profile/U42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "displayName": "Speedy",
                "userId": "U42"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let name = client.fetch_display_name("U42").await.unwrap();
        assert_eq!(name, "Speedy");
    }

    #[tokio::test]
    async fn fetch_message_content_returns_raw_bytes() {
        let server = MockServer::start().await;
        let payload = vec![0xFFu8, 0xD8, 0xFF, 0xE0];

        Mock::given(method("GET"))
            .and(path("/v2/bot/message/m-9/content"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let bytes = client.fetch_message_content("m-9").await.unwrap();
        assert_eq!(bytes, payload);
    }

    #[tokio::test]
    async fn fetch_message_content_error_is_channel_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/bot/message/gone/content"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.fetch_message_content("gone").await.unwrap_err();
        assert!(matches!(err, PacelogError::Channel { .. }));
    }
}
