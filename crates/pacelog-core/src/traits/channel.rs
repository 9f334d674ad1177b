// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging channel port for the LINE platform integration.

use async_trait::async_trait;

use crate::error::PacelogError;

/// Outbound messaging and content-download capabilities of the platform.
///
/// `reply` is tied to a one-time token valid only within the originating
/// webhook request's window; `push` can be sent at any time and is what the
/// pipeline uses for final outcome notifications after async work.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Sends a text reply bound to a reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), PacelogError>;

    /// Pushes a text message to a user, independent of any reply token.
    async fn push(&self, user_id: &str, text: &str) -> Result<(), PacelogError>;

    /// Fetches the user's display name from the platform profile API.
    ///
    /// Best-effort: callers fall back to a placeholder when this fails.
    async fn fetch_display_name(&self, user_id: &str) -> Result<String, PacelogError>;

    /// Downloads the binary content of a message (image bytes).
    async fn fetch_message_content(&self, message_id: &str) -> Result<Vec<u8>, PacelogError>;
}
