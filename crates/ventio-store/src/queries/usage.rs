// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily usage counter operations.
//!
//! Counters are keyed by (calendar date, feature). There is no reset
//! operation: a new date simply starts from a missing row.

use rusqlite::params;
use ventio_core::VentioError;

use crate::database::{map_tr_err, Database};

/// Increment the counter for (day, feature) and return the new count.
///
/// Creates the row at 1 if it does not exist. The increment is always
/// persisted, regardless of what the caller decides to do with the result.
pub async fn increment(db: &Database, day: &str, feature: &str) -> Result<u32, VentioError> {
    let day = day.to_string();
    let feature = feature.to_string();
    db.connection()
        .call(move |conn| {
            let count: u32 = conn.query_row(
                "INSERT INTO usage_counters (day, feature, count) VALUES (?1, ?2, 1)
                 ON CONFLICT(day, feature) DO UPDATE SET count = count + 1
                 RETURNING count",
                params![day, feature],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

/// Read the counter for (day, feature) without mutation. Missing row is 0.
pub async fn count(db: &Database, day: &str, feature: &str) -> Result<u32, VentioError> {
    let day = day.to_string();
    let feature = feature.to_string();
    db.connection()
        .call(move |conn| {
            let count: u32 = conn.query_row(
                "SELECT COALESCE(
                     (SELECT count FROM usage_counters WHERE day = ?1 AND feature = ?2), 0)",
                params![day, feature],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
