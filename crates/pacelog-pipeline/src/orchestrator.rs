// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event processing pipeline.
//!
//! One [`Pipeline`] instance serves the whole process; `handle_event` is
//! called once per webhook event, after the gateway has already acknowledged
//! the delivery. Stage failures inside the image chain degrade to "distance
//! not found" so the user always receives a definitive final message; only
//! profile resolution, content download, and persistence are fatal for the
//! event, and fatal means a generic error push, never silence.
//!
//! At-most-once: a dropped event is not retried. The user retries by
//! resending the image.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use pacelog_config::model::PipelineConfig;
use pacelog_core::types::{EventMessage, ExtractionResult, InboundEvent, NewRun};
use pacelog_core::{ChatPort, MessagingPort, OcrPort, PacelogError, RunStore};
use pacelog_imaging::{NormalizeOptions, normalize_for_ocr};

use crate::extract;
use crate::resolver;

const PROCESSING_TEXT: &str = "⏳ กำลังประมวลผลภาพ กรุณารอสักครู่...";
const UNREADABLE_TEXT: &str = "❌ ระบบไม่สามารถอ่านระยะทางได้\nกรุณาส่งรูปใหม่ครับ";
const TEXT_INSTRUCTION: &str =
    "🏃 กรุณาส่ง 'รูปภาพ' ผลการวิ่งเพื่อบันทึกระยะทางครับ\n(ไม่สามารถบันทึกจากการพิมพ์ข้อความได้)";
const GENERIC_ERROR_TEXT: &str = "เกิดข้อผิดพลาดในการประมวลผลครับ";

fn success_text(distance_km: f64) -> String {
    format!("🤖 ตรวจพบระยะทาง {distance_km} km\n✅ บันทึกเรียบร้อยครับ!")
}

/// Drives one webhook event through profile resolution, image normalization,
/// OCR, distance extraction, persistence, and user notification.
pub struct Pipeline {
    channel: Arc<dyn MessagingPort>,
    ocr: Arc<dyn OcrPort>,
    chat: Arc<dyn ChatPort>,
    store: Arc<dyn RunStore>,
    normalize: NormalizeOptions,
    call_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        channel: Arc<dyn MessagingPort>,
        ocr: Arc<dyn OcrPort>,
        chat: Arc<dyn ChatPort>,
        store: Arc<dyn RunStore>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            channel,
            ocr,
            chat,
            store,
            normalize: NormalizeOptions {
                max_width: config.max_image_width,
                threshold: config.binarize_threshold,
            },
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        }
    }

    /// Processes one inbound event to completion. Never returns an error;
    /// per-event failures end in a generic error push to the user.
    pub async fn handle_event(&self, event: InboundEvent) {
        if event.event_type != "message" {
            debug!(event_type = %event.event_type, "ignoring non-message event");
            return;
        }
        let Some(user_id) = event.user_id().map(str::to_string) else {
            debug!("ignoring event without user id");
            return;
        };
        let Some(message) = event.message.clone() else {
            debug!("ignoring message event without payload");
            return;
        };

        if let Err(err) = self.dispatch(&event, &user_id, &message).await {
            warn!(user_id, error = %err, "event processing failed");
            if let Err(push_err) = self.channel.push(&user_id, GENERIC_ERROR_TEXT).await {
                warn!(user_id, error = %push_err, "error notification failed, user gets silence");
            }
        }
    }

    async fn dispatch(
        &self,
        event: &InboundEvent,
        user_id: &str,
        message: &EventMessage,
    ) -> Result<(), PacelogError> {
        match message {
            EventMessage::Text { .. } => {
                if let Some(token) = &event.reply_token {
                    self.timed("reply", self.channel.reply(token, TEXT_INSTRUCTION))
                        .await?;
                }
                Ok(())
            }
            EventMessage::Image { id } => self.process_image(event, user_id, id).await,
            EventMessage::Other => {
                debug!(user_id, "ignoring unhandled message subtype");
                Ok(())
            }
        }
    }

    async fn process_image(
        &self,
        event: &InboundEvent,
        user_id: &str,
        message_id: &str,
    ) -> Result<(), PacelogError> {
        let profile =
            resolver::resolve_profile(&*self.channel, &*self.store, user_id, self.call_timeout)
                .await?;

        // Acknowledge before the slow external chain. The reply token is
        // one-shot and may already be stale; losing this message is fine.
        if let Some(token) = &event.reply_token
            && let Err(err) = self
                .timed("reply", self.channel.reply(token, PROCESSING_TEXT))
                .await
        {
            warn!(user_id, error = %err, "processing acknowledgement failed");
        }

        let original = self
            .timed(
                "content download",
                self.channel.fetch_message_content(message_id),
            )
            .await?;

        // The original bytes are stored regardless of whether we manage to
        // read a distance out of them.
        let image_url = self.store.store_image(user_id, &original).await?;

        let extraction = self.extract_distance(user_id, &original).await;

        if extraction.recognized() {
            let run_id = self
                .store
                .insert_run(&NewRun {
                    profile_id: profile.id,
                    image_url,
                    distance_km: extraction.distance_km,
                    raw_ocr_text: extraction.raw_text.clone(),
                })
                .await?;
            info!(
                user_id,
                profile_id = profile.id,
                run_id,
                distance_km = extraction.distance_km,
                "run recorded"
            );
            self.timed(
                "push",
                self.channel
                    .push(user_id, &success_text(extraction.distance_km)),
            )
            .await?;
        } else {
            info!(user_id, profile_id = profile.id, "no distance recognized");
            self.timed("push", self.channel.push(user_id, UNREADABLE_TEXT))
                .await?;
        }
        Ok(())
    }

    /// Normalize -> OCR -> chat extraction. Every stage failure degrades to
    /// an empty/zero result; the caller decides how to tell the user.
    async fn extract_distance(&self, user_id: &str, original: &[u8]) -> ExtractionResult {
        let normalized = match normalize_for_ocr(original, &self.normalize) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(user_id, error = %err, "image normalization failed");
                return ExtractionResult::default();
            }
        };

        let hint = format!("{user_id}.png");
        let raw_text = match self
            .timed("ocr", self.ocr.extract_text(&normalized, &hint))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(user_id, error = %err, "OCR failed");
                return ExtractionResult::default();
            }
        };

        if raw_text.trim().is_empty() {
            debug!(user_id, "OCR produced no text, skipping extraction");
            return ExtractionResult {
                raw_text,
                distance_km: 0.0,
            };
        }

        let reply = match self
            .timed(
                "chat",
                self.chat.complete(&extract::build_messages(&raw_text)),
            )
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(user_id, error = %err, degradable = err.is_degradable(), "extraction failed");
                return ExtractionResult {
                    raw_text,
                    distance_km: 0.0,
                };
            }
        };

        ExtractionResult {
            distance_km: extract::parse_distance(&reply),
            raw_text,
        }
    }

    /// Bounds one external call; a hung upstream must not pin the event
    /// forever.
    async fn timed<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = Result<T, PacelogError>>,
    ) -> Result<T, PacelogError> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(what, timeout_secs = self.call_timeout.as_secs(), "call timed out");
                Err(PacelogError::Timeout {
                    duration: self.call_timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacelog_core::types::EventSource;
    use pacelog_test_utils::{FailureMode, MockChat, MockMessaging, MockOcr, MockStore};

    struct Harness {
        channel: Arc<MockMessaging>,
        ocr: Arc<MockOcr>,
        chat: Arc<MockChat>,
        store: Arc<MockStore>,
        pipeline: Pipeline,
    }

    fn harness(ocr_text: &str, chat_reply: &str) -> Harness {
        let channel = Arc::new(MockMessaging::new());
        let ocr = Arc::new(MockOcr::new(ocr_text));
        let chat = Arc::new(MockChat::new(chat_reply));
        let store = Arc::new(MockStore::new());
        let pipeline = Pipeline::new(
            channel.clone(),
            ocr.clone(),
            chat.clone(),
            store.clone(),
            &PipelineConfig::default(),
        );
        Harness {
            channel,
            ocr,
            chat,
            store,
            pipeline,
        }
    }

    fn image_event(user_id: &str, message_id: &str) -> InboundEvent {
        InboundEvent {
            event_type: "message".to_string(),
            message: Some(EventMessage::Image {
                id: message_id.to_string(),
            }),
            source: Some(EventSource {
                user_id: Some(user_id.to_string()),
            }),
            reply_token: Some("rt-1".to_string()),
        }
    }

    fn text_event(user_id: &str, text: &str) -> InboundEvent {
        InboundEvent {
            event_type: "message".to_string(),
            message: Some(EventMessage::Text {
                text: text.to_string(),
            }),
            source: Some(EventSource {
                user_id: Some(user_id.to_string()),
            }),
            reply_token: Some("rt-1".to_string()),
        }
    }

    /// Small white PNG, decodable by the normalizer.
    fn tiny_png() -> Vec<u8> {
        use std::io::Cursor;
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([255u8, 255, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn image_happy_path_records_run_and_notifies() {
        let h = harness("Distance 427", "4.27");
        h.channel.set_content(tiny_png()).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        let replies = h.channel.replies().await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, PROCESSING_TEXT);

        let runs = h.store.runs().await;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].distance_km, 4.27);
        assert_eq!(runs[0].raw_ocr_text, "Distance 427");

        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, "U1");
        assert!(pushes[0].1.contains("4.27 km"), "got: {}", pushes[0].1);

        assert_eq!(h.store.images().await.len(), 1);
    }

    #[tokio::test]
    async fn text_message_gets_instruction_and_skips_pipeline() {
        let h = harness("irrelevant", "9.9");

        h.pipeline.handle_event(text_event("U1", "hello")).await;

        let replies = h.channel.replies().await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, TEXT_INSTRUCTION);
        assert_eq!(h.ocr.call_count(), 0);
        assert!(h.store.runs().await.is_empty());
        assert!(h.channel.pushes().await.is_empty());
    }

    #[tokio::test]
    async fn unrecognized_distance_pushes_resend_request() {
        let h = harness("no numbers here", "garbage");
        h.channel.set_content(tiny_png()).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.store.runs().await.is_empty());
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, UNREADABLE_TEXT);
        // Original image is stored even without a recognized distance.
        assert_eq!(h.store.images().await.len(), 1);
    }

    #[tokio::test]
    async fn ocr_failure_degrades_to_resend_request() {
        let h = harness("ignored", "ignored");
        h.channel.set_content(tiny_png()).await;
        h.ocr.set_failure(FailureMode::Provider).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.store.runs().await.is_empty());
        assert_eq!(h.store.images().await.len(), 1);
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, UNREADABLE_TEXT);
    }

    #[tokio::test]
    async fn chat_rate_limit_degrades_to_resend_request() {
        let h = harness("Distance 427", "ignored");
        h.channel.set_content(tiny_png()).await;
        h.chat.set_failure(FailureMode::RateLimited).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.store.runs().await.is_empty());
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, UNREADABLE_TEXT);
    }

    #[tokio::test]
    async fn undecodable_image_still_stored_then_resend_request() {
        let h = harness("ignored", "ignored");
        h.channel.set_content(vec![0xDE, 0xAD, 0xBE, 0xEF]).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert_eq!(h.store.images().await.len(), 1);
        assert_eq!(h.ocr.call_count(), 0);
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, UNREADABLE_TEXT);
    }

    #[tokio::test]
    async fn empty_ocr_text_skips_chat_call() {
        let h = harness("   \n", "9.9");
        h.channel.set_content(tiny_png()).await;

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.chat.prompts().await.is_empty());
        assert!(h.store.runs().await.is_empty());
        assert_eq!(h.channel.pushes().await[0].1, UNREADABLE_TEXT);
    }

    #[tokio::test]
    async fn profile_failure_pushes_generic_error() {
        let h = harness("ignored", "ignored");
        h.channel.set_content(tiny_png()).await;
        h.store.fail_resolve();

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.store.images().await.is_empty());
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, GENERIC_ERROR_TEXT);
    }

    #[tokio::test]
    async fn content_download_failure_pushes_generic_error() {
        let h = harness("ignored", "ignored");
        h.channel.fail_content();

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert!(h.store.images().await.is_empty());
        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, GENERIC_ERROR_TEXT);
    }

    #[tokio::test]
    async fn processing_reply_failure_does_not_abort() {
        let h = harness("Distance 427", "4.27");
        h.channel.set_content(tiny_png()).await;
        h.channel.fail_reply();

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        assert_eq!(h.store.runs().await.len(), 1);
        let pushes = h.channel.pushes().await;
        assert!(pushes[0].1.contains("4.27 km"));
    }

    #[tokio::test]
    async fn insert_failure_pushes_generic_error() {
        let h = harness("Distance 427", "4.27");
        h.channel.set_content(tiny_png()).await;
        h.store.fail_insert();

        h.pipeline.handle_event(image_event("U1", "m-1")).await;

        let pushes = h.channel.pushes().await;
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].1, GENERIC_ERROR_TEXT);
    }

    #[tokio::test]
    async fn non_message_events_are_ignored() {
        let h = harness("ignored", "ignored");
        let event = InboundEvent {
            event_type: "follow".to_string(),
            message: None,
            source: Some(EventSource {
                user_id: Some("U1".to_string()),
            }),
            reply_token: None,
        };

        h.pipeline.handle_event(event).await;

        assert!(h.channel.replies().await.is_empty());
        assert!(h.channel.pushes().await.is_empty());
    }

    #[tokio::test]
    async fn event_without_user_id_is_ignored() {
        let h = harness("ignored", "ignored");
        let event = InboundEvent {
            event_type: "message".to_string(),
            message: Some(EventMessage::Image {
                id: "m-1".to_string(),
            }),
            source: None,
            reply_token: Some("rt-1".to_string()),
        };

        h.pipeline.handle_event(event).await;

        assert!(h.channel.replies().await.is_empty());
        assert!(h.channel.pushes().await.is_empty());
    }

    #[tokio::test]
    async fn other_message_subtype_is_ignored() {
        let h = harness("ignored", "ignored");
        let event = InboundEvent {
            event_type: "message".to_string(),
            message: Some(EventMessage::Other),
            source: Some(EventSource {
                user_id: Some("U1".to_string()),
            }),
            reply_token: Some("rt-1".to_string()),
        };

        h.pipeline.handle_event(event).await;

        assert!(h.channel.replies().await.is_empty());
        assert!(h.channel.pushes().await.is_empty());
        assert_eq!(h.ocr.call_count(), 0);
    }
}
