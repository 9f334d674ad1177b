// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider ports for the OCR and chat-completion services.

use async_trait::async_trait;

use crate::error::PacelogError;
use crate::types::ChatMessage;

/// Text extraction from an image.
#[async_trait]
pub trait OcrPort: Send + Sync {
    /// Submits normalized image bytes and returns the concatenated recognized
    /// text of all successful pages, in service order.
    ///
    /// `filename_hint` only feeds the multipart content-disposition; it has
    /// no semantic meaning.
    async fn extract_text(
        &self,
        image: &[u8],
        filename_hint: &str,
    ) -> Result<String, PacelogError>;
}

/// Chat completion against a language model.
///
/// A 429-class upstream response surfaces as [`PacelogError::RateLimited`],
/// distinct from other provider failures.
///
/// [`PacelogError::RateLimited`]: crate::error::PacelogError::RateLimited
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Sends an ordered message sequence and returns the single reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PacelogError>;
}
