// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `pacelog-core::types` for use across
//! the port trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use pacelog_core::types::{NewRun, Profile, RunRecord};
