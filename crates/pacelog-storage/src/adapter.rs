// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RunStore port.

use async_trait::async_trait;

use pacelog_config::model::StorageConfig;
use pacelog_core::{NewRun, PacelogError, Profile, RunRecord, RunStore};

use crate::database::Database;
use crate::media::MediaStore;
use crate::queries;

/// SQLite-backed run store.
///
/// Wraps a [`Database`] handle and a [`MediaStore`] for image blobs,
/// delegating all query operations to the typed query modules.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
    media: MediaStore,
}

impl SqliteStore {
    /// Opens the database and media directory described by the config.
    pub async fn open(config: &StorageConfig) -> Result<Self, PacelogError> {
        let db = Database::open(&config.database_path).await?;
        let media = MediaStore::new(&config.media_dir, &config.public_base_url);
        Ok(Self { db, media })
    }

    /// Flushes and closes the underlying database.
    pub async fn close(self) -> Result<(), PacelogError> {
        self.db.close().await
    }
}

#[async_trait]
impl RunStore for SqliteStore {
    async fn resolve_profile(
        &self,
        line_user_id: &str,
        display_name: &str,
    ) -> Result<Profile, PacelogError> {
        queries::profiles::upsert_profile(&self.db, line_user_id, display_name).await
    }

    async fn get_profile(&self, line_user_id: &str) -> Result<Option<Profile>, PacelogError> {
        queries::profiles::get_profile(&self.db, line_user_id).await
    }

    async fn insert_run(&self, run: &NewRun) -> Result<i64, PacelogError> {
        queries::runs::insert_run(&self.db, run).await
    }

    async fn list_runs(&self, profile_id: i64) -> Result<Vec<RunRecord>, PacelogError> {
        queries::runs::list_runs_for_profile(&self.db, profile_id).await
    }

    async fn store_image(
        &self,
        line_user_id: &str,
        bytes: &[u8],
    ) -> Result<String, PacelogError> {
        self.media.store(line_user_id, bytes).await
    }
}
