// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History CRUD operations.
//!
//! History is partitioned by owner (a uid, or [`crate::models::ANONYMOUS_OWNER`])
//! and capped at [`HISTORY_CAP`] entries per owner: appending evicts the
//! oldest rows beyond the cap in the same write.

use rusqlite::params;
use ventio_core::VentioError;

use crate::database::{map_tr_err, Database};
use crate::models::HistoryEntry;

/// Maximum history entries retained per owner.
pub const HISTORY_CAP: usize = 20;

/// Append an entry for the owner, evicting the oldest rows beyond the cap.
///
/// Generates the id and timestamp; returns the stored entry.
pub async fn append(
    db: &Database,
    owner: &str,
    user_input: &str,
    mode: &str,
    response: &str,
) -> Result<HistoryEntry, VentioError> {
    let entry = HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_input: user_input.to_string(),
        mode: mode.to_string(),
        response: response.to_string(),
        created_at: chrono::Utc::now().timestamp_millis(),
    };
    append_entry(db, owner, &entry).await?;
    Ok(entry)
}

/// Append a fully formed entry (exposed so tests can pin timestamps).
pub async fn append_entry(
    db: &Database,
    owner: &str,
    entry: &HistoryEntry,
) -> Result<(), VentioError> {
    let owner = owner.to_string();
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO history (id, owner, user_input, mode, response, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id,
                    owner,
                    entry.user_input,
                    entry.mode,
                    entry.response,
                    entry.created_at,
                ],
            )?;
            // Evict everything past the newest HISTORY_CAP rows for this owner.
            conn.execute(
                "DELETE FROM history WHERE owner = ?1 AND id NOT IN (
                     SELECT id FROM history WHERE owner = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2)",
                params![owner, HISTORY_CAP as i64],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List the owner's entries, newest first.
pub async fn list(db: &Database, owner: &str) -> Result<Vec<HistoryEntry>, VentioError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_input, mode, response, created_at
                 FROM history WHERE owner = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let entries = stmt
                .query_map(params![owner], |row| {
                    Ok(HistoryEntry {
                        id: row.get(0)?,
                        user_input: row.get(1)?,
                        mode: row.get(2)?,
                        response: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a single entry by id. Returns whether a row was removed.
pub async fn delete(db: &Database, owner: &str, id: &str) -> Result<bool, VentioError> {
    let owner = owner.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM history WHERE owner = ?1 AND id = ?2",
                params![owner, id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove all of the owner's entries.
pub async fn clear(db: &Database, owner: &str) -> Result<(), VentioError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM history WHERE owner = ?1", params![owner])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ANONYMOUS_OWNER;

    fn entry(i: i64) -> HistoryEntry {
        HistoryEntry {
            id: format!("id-{i}"),
            user_input: format!("input {i}"),
            mode: "light".to_string(),
            response: format!("response {i}"),
            created_at: 1_000 + i,
        }
    }

    #[tokio::test]
    async fn append_and_list_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..3 {
            append_entry(&db, "user-1", &entry(i)).await.unwrap();
        }
        let listed = list(&db, "user-1").await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, "id-2");
        assert_eq!(listed[2].id, "id-0");
    }

    #[tokio::test]
    async fn twenty_first_append_evicts_the_oldest() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..21 {
            append_entry(&db, "user-1", &entry(i)).await.unwrap();
        }
        let listed = list(&db, "user-1").await.unwrap();
        assert_eq!(listed.len(), HISTORY_CAP);
        assert_eq!(listed[0].id, "id-20", "newest entry must be first");
        assert!(
            !listed.iter().any(|e| e.id == "id-0"),
            "oldest entry must be evicted"
        );
    }

    #[tokio::test]
    async fn owners_are_partitioned() {
        let db = Database::open_in_memory().await.unwrap();
        append_entry(&db, "user-1", &entry(1)).await.unwrap();
        append_entry(&db, ANONYMOUS_OWNER, &entry(2)).await.unwrap();

        assert_eq!(list(&db, "user-1").await.unwrap().len(), 1);
        assert_eq!(list(&db, ANONYMOUS_OWNER).await.unwrap().len(), 1);
        assert_eq!(list(&db, "user-2").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let db = Database::open_in_memory().await.unwrap();
        append_entry(&db, "user-1", &entry(1)).await.unwrap();
        append_entry(&db, "user-1", &entry(2)).await.unwrap();

        assert!(delete(&db, "user-1", "id-1").await.unwrap());
        assert!(!delete(&db, "user-1", "id-1").await.unwrap());

        let listed = list(&db, "user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "id-2");
    }

    #[tokio::test]
    async fn clear_empties_the_owner_bucket() {
        let db = Database::open_in_memory().await.unwrap();
        append_entry(&db, "user-1", &entry(1)).await.unwrap();
        append_entry(&db, "user-2", &entry(2)).await.unwrap();

        clear(&db, "user-1").await.unwrap();
        assert!(list(&db, "user-1").await.unwrap().is_empty());
        assert_eq!(list(&db, "user-2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn append_generates_id_and_timestamp() {
        let db = Database::open_in_memory().await.unwrap();
        let stored = append(&db, "user-1", "situation", "hard", "text")
            .await
            .unwrap();
        assert!(!stored.id.is_empty());
        assert!(stored.created_at > 0);
        let listed = list(&db, "user-1").await.unwrap();
        assert_eq!(listed[0], stored);
    }
}
