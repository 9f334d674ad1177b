// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API integration.
//!
//! Provides the [`LineClient`] adapter over the Messaging API (reply, push,
//! profile lookup, content download) and webhook signature verification.

pub mod client;
pub mod signature;

pub use client::LineClient;
pub use signature::{SIGNATURE_HEADER, sign, verify_signature};
