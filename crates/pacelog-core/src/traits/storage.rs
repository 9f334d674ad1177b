// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence port for profiles, runs, and image blobs.

use async_trait::async_trait;

use crate::error::PacelogError;
use crate::types::{NewRun, Profile, RunRecord};

/// Storage capabilities required by the pipeline.
///
/// The backend owns all concurrency control: `resolve_profile` must be atomic
/// on the unique external identifier so that two simultaneous first-contact
/// events for the same user yield exactly one profile row.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Looks up the profile for a LINE user id, creating it with the given
    /// display name if it does not exist yet. Atomic upsert.
    async fn resolve_profile(
        &self,
        line_user_id: &str,
        display_name: &str,
    ) -> Result<Profile, PacelogError>;

    /// Returns the profile for a LINE user id, if any.
    async fn get_profile(&self, line_user_id: &str) -> Result<Option<Profile>, PacelogError>;

    /// Inserts a run record and returns its row id. Only called with a
    /// strictly positive distance.
    async fn insert_run(&self, run: &NewRun) -> Result<i64, PacelogError>;

    /// Runs recorded for a profile, newest first.
    async fn list_runs(&self, profile_id: i64) -> Result<Vec<RunRecord>, PacelogError>;

    /// Stores the original (unnormalized) image bytes and returns the public
    /// URL under which they are served.
    async fn store_image(
        &self,
        line_user_id: &str,
        bytes: &[u8],
    ) -> Result<String, PacelogError>;
}
