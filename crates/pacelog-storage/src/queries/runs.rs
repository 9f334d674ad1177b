// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run record CRUD operations.

use rusqlite::params;

use pacelog_core::PacelogError;

use crate::database::Database;
use crate::models::{NewRun, RunRecord};

/// Insert a run and return its row id.
pub async fn insert_run(db: &Database, run: &NewRun) -> Result<i64, PacelogError> {
    let run = run.clone();
    db.connection()
        .call(move |conn| {
            let id = conn.query_row(
                "INSERT INTO runs (profile_id, image_url, distance_km, raw_ocr_text)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                params![run.profile_id, run.image_url, run.distance_km, run.raw_ocr_text],
                |row| row.get(0),
            )?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Runs for a profile, newest first.
pub async fn list_runs_for_profile(
    db: &Database,
    profile_id: i64,
) -> Result<Vec<RunRecord>, PacelogError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, profile_id, image_url, distance_km, raw_ocr_text, created_at
                 FROM runs WHERE profile_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![profile_id], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    profile_id: row.get(1)?,
                    image_url: row.get(2)?,
                    distance_km: row.get(3)?,
                    raw_ocr_text: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            let mut runs = Vec::new();
            for row in rows {
                runs.push(row?);
            }
            Ok(runs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
