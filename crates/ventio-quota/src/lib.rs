// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage accounting and access policy for the Ventio expression service.
//!
//! Two related but deliberately separate mechanisms live here:
//!
//! - [`UsageLedger`]: daily per-feature call counters against tier limits,
//!   where the tier comes from a persisted premium flag.
//! - [`policy`]: pure mode/speech access checks over the live session
//!   subscription.
//!
//! The two read different premium sources by design; see the module docs
//! on [`ledger`].

pub mod ledger;
pub mod limits;
pub mod policy;

pub use ledger::{UsageLedger, PREMIUM_FLAG_KEY};
pub use limits::{daily_limit, Tier};
pub use policy::{can_access_mode, can_access_speech, denial_reason, DenialReason};
