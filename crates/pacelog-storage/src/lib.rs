// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the pacelog bot backend.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, typed CRUD operations for profiles
//! and runs, and a disk-backed store for original run images.

pub mod adapter;
pub mod database;
pub mod media;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
pub use media::MediaStore;
pub use models::*;
