// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the pacelog bot backend.

use thiserror::Error;

/// The primary error type used across all pacelog adapter traits and the
/// event pipeline.
#[derive(Debug, Error)]
pub enum PacelogError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging platform errors (reply/push delivery, profile fetch, content download).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OCR / chat provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upstream rate limiting (HTTP 429). Kept distinct from [`Self::Provider`]
    /// so callers can apply backoff instead of treating it as a hard failure.
    #[error("rate limited by upstream: {0}")]
    RateLimited(String),

    /// Image decoding or transformation errors.
    #[error("imaging error: {0}")]
    Imaging(String),

    /// Storage backend errors (database, media store).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external call exceeded its time budget.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PacelogError {
    /// True when the pipeline should degrade the step to an empty result
    /// instead of aborting the event.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            PacelogError::Provider { .. }
                | PacelogError::RateLimited(_)
                | PacelogError::Imaging(_)
                | PacelogError::Timeout { .. }
        )
    }
}
