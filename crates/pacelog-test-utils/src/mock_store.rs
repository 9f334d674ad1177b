// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory RunStore implementation for pipeline tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pacelog_core::{NewRun, PacelogError, Profile, RunRecord, RunStore};

/// In-memory run store.
///
/// Profiles are keyed by LINE user id; runs live in insertion order and are
/// returned newest first, matching the SQLite adapter. Individual operations
/// can be made to fail for error-path tests.
pub struct MockStore {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    runs: Arc<Mutex<Vec<RunRecord>>>,
    images: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    fail_resolve: AtomicBool,
    fail_insert: AtomicBool,
    fail_image: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
            runs: Arc::new(Mutex::new(Vec::new())),
            images: Arc::new(Mutex::new(Vec::new())),
            fail_resolve: AtomicBool::new(false),
            fail_insert: AtomicBool::new(false),
            fail_image: AtomicBool::new(false),
        }
    }

    pub fn fail_resolve(&self) {
        self.fail_resolve.store(true, Ordering::SeqCst);
    }

    pub fn fail_insert(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn fail_image(&self) {
        self.fail_image.store(true, Ordering::SeqCst);
    }

    /// All persisted runs in insertion order.
    pub async fn runs(&self) -> Vec<RunRecord> {
        self.runs.lock().await.clone()
    }

    /// All stored `(line_user_id, bytes)` image blobs.
    pub async fn images(&self) -> Vec<(String, Vec<u8>)> {
        self.images.lock().await.clone()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn storage_err(what: &str) -> PacelogError {
    PacelogError::Storage {
        source: format!("mock {what} failure").into(),
    }
}

#[async_trait]
impl RunStore for MockStore {
    async fn resolve_profile(
        &self,
        line_user_id: &str,
        display_name: &str,
    ) -> Result<Profile, PacelogError> {
        if self.fail_resolve.load(Ordering::SeqCst) {
            return Err(storage_err("resolve_profile"));
        }
        let mut profiles = self.profiles.lock().await;
        let next_id = profiles.len() as i64 + 1;
        let profile = profiles
            .entry(line_user_id.to_string())
            .or_insert_with(|| Profile {
                id: next_id,
                line_user_id: line_user_id.to_string(),
                display_name: display_name.to_string(),
            });
        Ok(profile.clone())
    }

    async fn get_profile(&self, line_user_id: &str) -> Result<Option<Profile>, PacelogError> {
        Ok(self.profiles.lock().await.get(line_user_id).cloned())
    }

    async fn insert_run(&self, run: &NewRun) -> Result<i64, PacelogError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(storage_err("insert_run"));
        }
        let mut runs = self.runs.lock().await;
        let id = runs.len() as i64 + 1;
        runs.push(RunRecord {
            id,
            profile_id: run.profile_id,
            image_url: run.image_url.clone(),
            distance_km: run.distance_km,
            raw_ocr_text: run.raw_ocr_text.clone(),
            created_at: format!("2026-01-01T00:00:{:02}.000Z", id % 60),
        });
        Ok(id)
    }

    async fn list_runs(&self, profile_id: i64) -> Result<Vec<RunRecord>, PacelogError> {
        let mut runs: Vec<RunRecord> = self
            .runs
            .lock()
            .await
            .iter()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect();
        runs.reverse();
        Ok(runs)
    }

    async fn store_image(
        &self,
        line_user_id: &str,
        bytes: &[u8],
    ) -> Result<String, PacelogError> {
        if self.fail_image.load(Ordering::SeqCst) {
            return Err(storage_err("store_image"));
        }
        let mut images = self.images.lock().await;
        images.push((line_user_id.to_string(), bytes.to_vec()));
        Ok(format!(
            "http://localhost:3000/media/{line_user_id}/{}.jpg",
            images.len()
        ))
    }
}
