// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical identity registry operations for the bridge-login endpoint.

use rusqlite::{params, OptionalExtension};
use ventio_core::VentioError;

use crate::database::{map_tr_err, Database};
use crate::models::AuthUser;

/// Look up a canonical identity by uid.
pub async fn get(db: &Database, uid: &str) -> Result<Option<AuthUser>, VentioError> {
    let uid = uid.to_string();
    db.connection()
        .call(move |conn| {
            let user = conn
                .query_row(
                    "SELECT uid, provider, email, display_name, photo_url, created_at, last_login
                     FROM auth_users WHERE uid = ?1",
                    params![uid],
                    |row| {
                        Ok(AuthUser {
                            uid: row.get(0)?,
                            provider: row.get(1)?,
                            email: row.get(2)?,
                            display_name: row.get(3)?,
                            photo_url: row.get(4)?,
                            created_at: row.get(5)?,
                            last_login: row.get(6)?,
                        })
                    },
                )
                .optional()?;
            Ok(user)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new canonical identity.
pub async fn insert(db: &Database, user: &AuthUser) -> Result<(), VentioError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO auth_users
                     (uid, provider, email, display_name, photo_url, created_at, last_login)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.uid,
                    user.provider,
                    user.email,
                    user.display_name,
                    user.photo_url,
                    user.created_at,
                    user.last_login,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Update the last-login timestamp of an existing identity.
pub async fn touch_last_login(db: &Database, uid: &str, when: &str) -> Result<(), VentioError> {
    let uid = uid.to_string();
    let when = when.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE auth_users SET last_login = ?2 WHERE uid = ?1",
                params![uid, when],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
