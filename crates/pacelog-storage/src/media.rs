// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disk-backed store for original run images.
//!
//! Images land under `{media_dir}/{line_user_id}/{timestamp}-{seq}.jpg` and
//! are addressed externally as
//! `{public_base_url}/{line_user_id}/{timestamp}-{seq}.jpg`. Serving the
//! directory is the deployment's concern (reverse proxy or object-store
//! sync).

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::debug;

use pacelog_core::PacelogError;

/// Writes original image bytes to disk and mints their public URL.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_base_url: String,
    // Timestamps alone collide when one user sends two images in the same
    // millisecond; the sequence number keeps filenames unique per process.
    seq: Arc<AtomicU64>,
}

impl MediaStore {
    pub fn new(media_dir: &str, public_base_url: &str) -> Self {
        Self {
            root: PathBuf::from(media_dir),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stores the image and returns its public URL.
    ///
    /// The user id becomes a path segment, so anything that could escape the
    /// media root is rejected.
    pub async fn store(&self, line_user_id: &str, bytes: &[u8]) -> Result<String, PacelogError> {
        if !is_safe_segment(line_user_id) {
            return Err(PacelogError::Internal(format!(
                "refusing unsafe media path segment: {line_user_id:?}"
            )));
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let filename = format!("{}-{seq}.jpg", Utc::now().timestamp_millis());
        let dir = self.root.join(line_user_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PacelogError::Storage {
                source: Box::new(e),
            })?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PacelogError::Storage {
                source: Box::new(e),
            })?;

        debug!(path = %path.display(), size = bytes.len(), "original image stored");
        Ok(format!(
            "{}/{line_user_id}/{filename}",
            self.public_base_url
        ))
    }
}

/// A segment is safe when it is non-empty ASCII alphanumeric (plus `-` and
/// `_`). LINE user ids are `U` followed by 32 hex characters, well within
/// this set.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
