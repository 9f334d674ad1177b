// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the pacelog pipeline's external capabilities.
//!
//! The orchestrator never talks to LINE, Typhoon, or SQLite directly; it is
//! written against these ports so tests can substitute deterministic mocks.

pub mod channel;
pub mod provider;
pub mod storage;

pub use channel::MessagingPort;
pub use provider::{ChatPort, OcrPort};
pub use storage::RunStore;
