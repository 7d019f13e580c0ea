// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily usage accounting against tier limits.
//!
//! Counters are keyed by local calendar date and feature; the date rolling
//! over is the only reset. The tier lookup reads the persisted premium
//! flag, not the live subscription record -- Access Policy uses the live
//! record, and the two may disagree between auth-state updates. That split
//! matches the observed product behavior and is kept deliberately.

use chrono::Local;
use tracing::{debug, info};
use ventio_core::{Feature, VentioError};
use ventio_store::queries::{flags, usage};
use ventio_store::Database;

use crate::limits::{daily_limit, Tier};

/// Flag key holding the cached premium state used for tier lookup.
pub const PREMIUM_FLAG_KEY: &str = "is_premium";

/// Persistent daily usage ledger backed by the service database.
#[derive(Clone)]
pub struct UsageLedger {
    db: Database,
}

impl UsageLedger {
    /// Create a ledger over the given database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record one call for `feature` and decide whether it is allowed.
    ///
    /// The counter is incremented and persisted first; the decision compares
    /// the incremented value against the tier limit. A limit of 5 therefore
    /// allows calls 1 through 5 and denies the 6th attempt -- and the denied
    /// attempt's increment stays on the counter until the date rolls over.
    pub async fn record_and_check(&self, feature: Feature) -> Result<bool, VentioError> {
        let day = today();
        let tier = self.tier().await?;
        let limit = daily_limit(tier, feature);

        let count = usage::increment(&self.db, &day, &feature.to_string()).await?;
        let allowed = count <= limit;

        if allowed {
            debug!(%feature, %day, count, limit, "usage recorded");
        } else {
            info!(%feature, %day, count, limit, "usage limit exceeded");
        }
        Ok(allowed)
    }

    /// Today's raw count for `feature`, without mutation.
    pub async fn usage_count(&self, feature: Feature) -> Result<u32, VentioError> {
        usage::count(&self.db, &today(), &feature.to_string()).await
    }

    /// Calls left today for `feature`. Never negative: a counter pushed past
    /// its limit by denied attempts reads as zero remaining.
    pub async fn remaining(&self, feature: Feature) -> Result<u32, VentioError> {
        let tier = self.tier().await?;
        let limit = daily_limit(tier, feature);
        let count = self.usage_count(feature).await?;
        Ok(limit.saturating_sub(count))
    }

    /// Current tier, from the persisted premium flag. Unset reads as free.
    pub async fn tier(&self) -> Result<Tier, VentioError> {
        let flag = flags::get(&self.db, PREMIUM_FLAG_KEY).await?;
        Ok(Tier::from_premium(flag.as_deref() == Some("true")))
    }

    /// Persist the premium flag used by [`tier`](Self::tier).
    pub async fn set_premium(&self, is_premium: bool) -> Result<(), VentioError> {
        flags::set(
            &self.db,
            PREMIUM_FLAG_KEY,
            if is_premium { "true" } else { "false" },
        )
        .await
    }
}

/// Local calendar date key, `YYYY-MM-DD`.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
