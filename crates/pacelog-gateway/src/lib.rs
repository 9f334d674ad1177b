// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook gateway for the pacelog bot.
//!
//! Exposes the signature-verified `POST /webhook` endpoint and a public
//! `GET /health`, acknowledging deliveries immediately and handing events to
//! the pipeline in background tasks.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, build_router, start_server, start_server_with_shutdown};
