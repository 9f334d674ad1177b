// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock OCR and chat providers for deterministic testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pacelog_core::{ChatMessage, ChatPort, OcrPort, PacelogError};

/// How a mock provider call should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    Provider,
    RateLimited,
}

fn failure_err(mode: FailureMode, what: &str) -> Option<PacelogError> {
    match mode {
        FailureMode::None => None,
        FailureMode::Provider => Some(PacelogError::Provider {
            message: format!("mock {what} failure"),
            source: None,
        }),
        FailureMode::RateLimited => Some(PacelogError::RateLimited(format!(
            "mock {what} rate limit"
        ))),
    }
}

/// Mock OCR provider returning a canned transcription.
pub struct MockOcr {
    text: Arc<Mutex<String>>,
    failure: Arc<Mutex<FailureMode>>,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.to_string())),
            failure: Arc::new(Mutex::new(FailureMode::None)),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_failure(&self, mode: FailureMode) {
        *self.failure.lock().await = mode;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrPort for MockOcr {
    async fn extract_text(
        &self,
        _image: &[u8],
        _filename_hint: &str,
    ) -> Result<String, PacelogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = failure_err(*self.failure.lock().await, "OCR") {
            return Err(err);
        }
        Ok(self.text.lock().await.clone())
    }
}

/// Mock chat provider returning a canned completion and recording prompts.
pub struct MockChat {
    reply: Arc<Mutex<String>>,
    failure: Arc<Mutex<FailureMode>>,
    prompts: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply.to_string())),
            failure: Arc::new(Mutex::new(FailureMode::None)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_failure(&self, mode: FailureMode) {
        *self.failure.lock().await = mode;
    }

    /// All message slices passed to `complete()`.
    pub async fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ChatPort for MockChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PacelogError> {
        self.prompts.lock().await.push(messages.to_vec());
        if let Some(err) = failure_err(*self.failure.lock().await, "chat") {
            return Err(err);
        }
        Ok(self.reply.lock().await.clone())
    }
}
