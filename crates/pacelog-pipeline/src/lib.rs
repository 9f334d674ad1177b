// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event-processing pipeline for the pacelog bot.
//!
//! Ties the channel, OCR, chat, and storage ports together: resolves the
//! sender's profile, runs the image through normalization and OCR, extracts
//! the distance via a chat completion, persists recognized runs, and sends
//! the user a definitive final notification.

pub mod extract;
pub mod orchestrator;
pub mod resolver;

pub use orchestrator::Pipeline;
