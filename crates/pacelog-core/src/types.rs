// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the pacelog workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One inbound webhook event from the LINE platform.
///
/// Ephemeral: exists only for the duration of one dispatch. The reply token
/// is one-time-use and only valid within the originating request's window.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    /// Platform-assigned event type ("message", "follow", ...). Everything
    /// except "message" is ignored by the pipeline.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Message payload, present for message events.
    #[serde(default)]
    pub message: Option<EventMessage>,

    /// Sender identity.
    #[serde(default)]
    pub source: Option<EventSource>,

    /// One-time reply token for this event.
    #[serde(default, rename = "replyToken")]
    pub reply_token: Option<String>,
}

impl InboundEvent {
    /// The sender's external user identifier, when present.
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }
}

/// Sender information attached to an inbound event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

/// Message payload of an inbound event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    /// Plain text message.
    Text { text: String },
    /// Image message; `id` is the opaque content identifier used to fetch
    /// the binary from the platform.
    Image { id: String },
    /// Any other message subtype the pipeline does not handle.
    #[serde(other)]
    Other,
}

impl EventMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            EventMessage::Text { .. } => MessageKind::Text,
            EventMessage::Image { .. } => MessageKind::Image,
            EventMessage::Other => MessageKind::Other,
        }
    }
}

/// Message subtype, used for routing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Other,
}

/// A stored user account.
///
/// `line_user_id` is the unique external identifier; it never changes after
/// creation. `display_name` is best-effort sourced from the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub line_user_id: String,
    pub display_name: String,
}

/// A new run observation to persist. Only created when the extracted
/// distance is strictly positive.
#[derive(Debug, Clone)]
pub struct NewRun {
    pub profile_id: i64,
    pub image_url: String,
    pub distance_km: f64,
    pub raw_ocr_text: String,
}

/// A persisted run record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub profile_id: i64,
    pub image_url: String,
    pub distance_km: f64,
    pub raw_ocr_text: String,
    pub created_at: String,
}

/// Transient result of the OCR + extraction stages. Not persisted on its own.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub raw_text: String,
    pub distance_km: f64,
}

impl ExtractionResult {
    /// True when a plausible distance was recognized and the run should be
    /// persisted.
    pub fn recognized(&self) -> bool {
        self.distance_km > 0.0
    }
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
