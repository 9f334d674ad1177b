// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mock implementations of the pacelog ports for testing.
//!
//! Not intended for production use.

pub mod mock_channel;
pub mod mock_provider;
pub mod mock_store;

pub use mock_channel::MockMessaging;
pub use mock_provider::{FailureMode, MockChat, MockOcr};
pub use mock_store::MockStore;
