// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging channel for deterministic testing.
//!
//! `MockMessaging` implements `MessagingPort` with captured outbound replies
//! and pushes, plus injectable failures for every capability.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pacelog_core::{MessagingPort, PacelogError};

/// A mock LINE channel for testing.
///
/// Captures everything sent through `reply()` and `push()` for later
/// assertion. Profile fetches and content downloads return injectable
/// canned values, or fail when the corresponding flag is set.
pub struct MockMessaging {
    replies: Arc<Mutex<Vec<(String, String)>>>,
    pushes: Arc<Mutex<Vec<(String, String)>>>,
    display_name: Arc<Mutex<String>>,
    content: Arc<Mutex<Vec<u8>>>,
    fail_reply: AtomicBool,
    fail_push: AtomicBool,
    fail_profile: AtomicBool,
    fail_content: AtomicBool,
    profile_delay_ms: AtomicU64,
    content_delay_ms: AtomicU64,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            pushes: Arc::new(Mutex::new(Vec::new())),
            display_name: Arc::new(Mutex::new("Mock Runner".to_string())),
            content: Arc::new(Mutex::new(Vec::new())),
            fail_reply: AtomicBool::new(false),
            fail_push: AtomicBool::new(false),
            fail_profile: AtomicBool::new(false),
            fail_content: AtomicBool::new(false),
            profile_delay_ms: AtomicU64::new(0),
            content_delay_ms: AtomicU64::new(0),
        }
    }

    /// Sets the bytes returned by `fetch_message_content()`.
    pub async fn set_content(&self, bytes: Vec<u8>) {
        *self.content.lock().await = bytes;
    }

    /// Sets the display name returned by `fetch_display_name()`.
    pub async fn set_display_name(&self, name: &str) {
        *self.display_name.lock().await = name.to_string();
    }

    pub fn fail_reply(&self) {
        self.fail_reply.store(true, Ordering::SeqCst);
    }

    pub fn fail_push(&self) {
        self.fail_push.store(true, Ordering::SeqCst);
    }

    pub fn fail_profile(&self) {
        self.fail_profile.store(true, Ordering::SeqCst);
    }

    pub fn fail_content(&self) {
        self.fail_content.store(true, Ordering::SeqCst);
    }

    /// Makes `fetch_display_name()` sleep before answering.
    pub fn delay_profile(&self, delay: Duration) {
        self.profile_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Makes `fetch_message_content()` sleep before answering, for tests
    /// that need a slow download in flight.
    pub fn delay_content(&self, delay: Duration) {
        self.content_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// All captured `(reply_token, text)` pairs.
    pub async fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().await.clone()
    }

    /// All captured `(user_id, text)` pairs.
    pub async fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().await.clone()
    }
}

impl Default for MockMessaging {
    fn default() -> Self {
        Self::new()
    }
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

fn channel_err(what: &str) -> PacelogError {
    PacelogError::Channel {
        message: format!("mock {what} failure"),
        source: None,
    }
}

#[async_trait]
impl MessagingPort for MockMessaging {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), PacelogError> {
        if self.fail_reply.load(Ordering::SeqCst) {
            return Err(channel_err("reply"));
        }
        self.replies
            .lock()
            .await
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }

    async fn push(&self, user_id: &str, text: &str) -> Result<(), PacelogError> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(channel_err("push"));
        }
        self.pushes
            .lock()
            .await
            .push((user_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn fetch_display_name(&self, _user_id: &str) -> Result<String, PacelogError> {
        sleep_ms(self.profile_delay_ms.load(Ordering::SeqCst)).await;
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(channel_err("profile fetch"));
        }
        Ok(self.display_name.lock().await.clone())
    }

    async fn fetch_message_content(&self, _message_id: &str) -> Result<Vec<u8>, PacelogError> {
        sleep_ms(self.content_delay_ms.load(Ordering::SeqCst)).await;
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(channel_err("content download"));
        }
        Ok(self.content.lock().await.clone())
    }
}
