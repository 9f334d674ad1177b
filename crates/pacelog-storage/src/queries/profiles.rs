// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile CRUD operations.

use rusqlite::{OptionalExtension, params};

use pacelog_core::PacelogError;

use crate::database::Database;
use crate::models::Profile;

/// Get or create the profile for a LINE user id.
///
/// The upsert is a single statement, so two concurrent first-contact events
/// for the same user resolve to the same row. An existing display name is
/// never overwritten; the supplied name only applies on first insert.
pub async fn upsert_profile(
    db: &Database,
    line_user_id: &str,
    display_name: &str,
) -> Result<Profile, PacelogError> {
    let line_user_id = line_user_id.to_string();
    let display_name = display_name.to_string();
    db.connection()
        .call(move |conn| {
            let profile = conn.query_row(
                "INSERT INTO profiles (line_user_id, display_name)
                 VALUES (?1, ?2)
                 ON CONFLICT(line_user_id) DO UPDATE SET line_user_id = excluded.line_user_id
                 RETURNING id, line_user_id, display_name",
                params![line_user_id, display_name],
                |row| {
                    Ok(Profile {
                        id: row.get(0)?,
                        line_user_id: row.get(1)?,
                        display_name: row.get(2)?,
                    })
                },
            )?;
            Ok(profile)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a profile by LINE user id.
pub async fn get_profile(
    db: &Database,
    line_user_id: &str,
) -> Result<Option<Profile>, PacelogError> {
    let line_user_id = line_user_id.to_string();
    db.connection()
        .call(move |conn| {
            let profile = conn
                .query_row(
                    "SELECT id, line_user_id, display_name
                     FROM profiles WHERE line_user_id = ?1",
                    params![line_user_id],
                    |row| {
                        Ok(Profile {
                            id: row.get(0)?,
                            line_user_id: row.get(1)?,
                            display_name: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(profile)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn upsert_creates_then_returns_same_row() {
        let (db, _dir) = setup_db().await;

        let first = upsert_profile(&db, "U123", "Speedy").await.unwrap();
        assert_eq!(first.line_user_id, "U123");
        assert_eq!(first.display_name, "Speedy");

        let second = upsert_profile(&db, "U123", "Renamed").await.unwrap();
        assert_eq!(second.id, first.id);
        // First-write-wins for the display name.
        assert_eq!(second.display_name, "Speedy");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_profile_misses_unknown_user() {
        let (db, _dir) = setup_db().await;
        let found = get_profile(&db, "Unobody").await.unwrap();
        assert!(found.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_profile_finds_created_user() {
        let (db, _dir) = setup_db().await;
        let created = upsert_profile(&db, "U42", "Runner").await.unwrap();
        let found = get_profile(&db, "U42").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.display_name, "Runner");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_upserts_yield_one_profile() {
        let (db, _dir) = setup_db().await;

        let (a, b) = tokio::join!(
            upsert_profile(&db, "Urace", "First"),
            upsert_profile(&db, "Urace", "Second"),
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);

        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT COUNT(*) FROM profiles WHERE line_user_id = 'Urace'",
                    [],
                    |row| row.get(0),
                )?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);

        db.close().await.unwrap();
    }
}
