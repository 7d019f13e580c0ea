// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Ventio expression service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed query
//! modules for usage counters, generation history, the subscription cache,
//! flags, and the canonical identity registry.
//!
//! Policy decisions (limits, freshness windows, tier rules) live upstream;
//! this crate only moves rows with last-write-wins semantics.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::{AuthUser, CachedSubscription, HistoryEntry, ANONYMOUS_OWNER};
