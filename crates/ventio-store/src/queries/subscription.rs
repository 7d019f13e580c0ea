// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached subscription document rows.
//!
//! Stores the raw JSON of the last successfully fetched subscription per
//! user, with its fetch timestamp. Freshness policy lives in the identity
//! crate; this module only moves rows.

use rusqlite::{params, OptionalExtension};
use ventio_core::VentioError;

use crate::database::{map_tr_err, Database};
use crate::models::CachedSubscription;

/// Read the cached subscription for a user, if any.
pub async fn get(db: &Database, user_id: &str) -> Result<Option<CachedSubscription>, VentioError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT data, cached_at FROM subscription_cache WHERE user_id = ?1",
                    params![user_id],
                    |row| {
                        Ok(CachedSubscription {
                            data: row.get(0)?,
                            cached_at: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the cached subscription for a user.
pub async fn put(
    db: &Database,
    user_id: &str,
    data: &str,
    cached_at: i64,
) -> Result<(), VentioError> {
    let user_id = user_id.to_string();
    let data = data.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO subscription_cache (user_id, data, cached_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET data = ?2, cached_at = ?3",
                params![user_id, data, cached_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
