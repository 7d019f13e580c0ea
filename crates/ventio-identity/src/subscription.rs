// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription cache: remote source of truth, local copy with a freshness
//! window.
//!
//! Availability over consistency: a user's premium status may be up to an
//! hour stale, or unknown when the record was never fetched while online.
//! `fetch` never returns an error -- every failure path degrades to
//! stale-or-absent data.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};
use ventio_core::Subscription;
use ventio_store::models::CachedSubscription;
use ventio_store::queries::subscription as cache_rows;
use ventio_store::Database;

use crate::provider::{Connectivity, SubscriptionDirectory};

/// Freshness window for cached subscription data.
const CACHE_TTL_MS: i64 = 3_600_000; // 1 hour

/// Remote subscription fetcher with a TTL-bounded local cache.
pub struct SubscriptionCache {
    db: Database,
    directory: Arc<dyn SubscriptionDirectory>,
    connectivity: Arc<dyn Connectivity>,
}

impl SubscriptionCache {
    pub fn new(
        db: Database,
        directory: Arc<dyn SubscriptionDirectory>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            db,
            directory,
            connectivity,
        }
    }

    /// Fetch the user's subscription, preferring the local cache.
    ///
    /// 1. Cache entry younger than an hour: returned without a remote call.
    /// 2. Offline: cached value if present, else `None`.
    /// 3. Remote fetch; success overwrites the cache.
    /// 4. Remote failure: logged, cached value if present, else `None`.
    pub async fn fetch(&self, uid: &str) -> Option<Subscription> {
        let cached = match cache_rows::get(&self.db, uid).await {
            Ok(row) => row,
            Err(e) => {
                warn!(uid, error = %e, "subscription cache read failed");
                None
            }
        };

        let now = Utc::now().timestamp_millis();
        if let Some(row) = &cached {
            if now - row.cached_at < CACHE_TTL_MS {
                if let Some(subscription) = parse_cached(uid, row) {
                    debug!(uid, "subscription cache hit");
                    return Some(subscription);
                }
                // Corrupted fresh entry: fall through to the remote path.
            }
        }

        if !self.connectivity.is_online() {
            debug!(uid, "offline, using cached subscription");
            return cached.as_ref().and_then(|row| parse_cached(uid, row));
        }

        match self.directory.fetch_subscription(uid).await {
            Ok(Some(subscription)) => {
                self.store(uid, &subscription, now).await;
                Some(subscription)
            }
            Ok(None) => None,
            Err(e) => {
                error!(uid, error = %e, "subscription fetch failed, falling back to cache");
                cached.as_ref().and_then(|row| parse_cached(uid, row))
            }
        }
    }

    async fn store(&self, uid: &str, subscription: &Subscription, now: i64) {
        let data = match serde_json::to_string(subscription) {
            Ok(data) => data,
            Err(e) => {
                warn!(uid, error = %e, "subscription serialization failed");
                return;
            }
        };
        if let Err(e) = cache_rows::put(&self.db, uid, &data, now).await {
            warn!(uid, error = %e, "subscription cache write failed");
        }
    }
}

/// Parse a cached row; corruption is logged and treated as a miss.
fn parse_cached(uid: &str, row: &CachedSubscription) -> Option<Subscription> {
    match serde_json::from_str(&row.data) {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            warn!(uid, error = %e, "corrupted subscription cache entry, treating as miss");
            None
        }
    }
}
