// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the pacelog bot backend.
//!
//! Provides the shared error type, domain types (events, profiles, runs),
//! and the adapter traits the pipeline is written against. Concrete
//! integrations (LINE, Typhoon, SQLite) live in sibling crates and implement
//! the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PacelogError;
pub use types::{
    ChatMessage, EventMessage, ExtractionResult, InboundEvent, MessageKind, NewRun, Profile,
    RunRecord,
};

pub use traits::{ChatPort, MessagingPort, OcrPort, RunStore};
