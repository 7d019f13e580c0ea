// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small string key/value flags.

use rusqlite::{params, OptionalExtension};
use ventio_core::VentioError;

use crate::database::{map_tr_err, Database};

/// Read a flag value, if set.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, VentioError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM flags WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
        .map_err(map_tr_err)
}

/// Set a flag value, overwriting any existing value.
pub async fn set(db: &Database, key: &str, value: &str) -> Result<(), VentioError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO flags (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_flag_reads_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get(&db, "is_premium").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_and_overwrite() {
        let db = Database::open_in_memory().await.unwrap();
        set(&db, "is_premium", "true").await.unwrap();
        assert_eq!(get(&db, "is_premium").await.unwrap().as_deref(), Some("true"));
        set(&db, "is_premium", "false").await.unwrap();
        assert_eq!(
            get(&db, "is_premium").await.unwrap().as_deref(),
            Some("false")
        );
    }
}
