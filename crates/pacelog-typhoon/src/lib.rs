// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typhoon API integration: OCR and chat completion clients.

pub mod chat;
pub mod ocr;
pub mod types;

pub use chat::TyphoonChatClient;
pub use ocr::TyphoonOcrClient;
