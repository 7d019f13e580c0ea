// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure access policy over intensity modes and speech synthesis.
//!
//! Unlike the usage ledger, these functions read the live subscription
//! attached to the session snapshot. They take `now_ms` as a parameter so
//! expiry decisions stay deterministic under test.

use std::str::FromStr;

use ventio_core::{Mode, UserSession};

/// Why an access check failed, for routing the user to the right flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session: prompt sign-in.
    SignInRequired,
    /// Signed in but not entitled: prompt upgrade.
    PremiumRequired,
}

/// Whether the session may generate in the given mode.
///
/// `light` needs nothing, `hard` needs any session, `very_hard` needs the
/// premium-access invariant. Unrecognized mode strings are denied.
pub fn can_access_mode(mode: &str, session: Option<&UserSession>, now_ms: i64) -> bool {
    match Mode::from_str(mode) {
        Ok(Mode::Light) => true,
        Ok(Mode::Hard) => session.is_some(),
        Ok(Mode::VeryHard) => session.is_some_and(|s| s.has_premium_access(now_ms)),
        Err(_) => false,
    }
}

/// Whether the session may use speech synthesis.
///
/// Exactly the premium-access invariant. The orchestrator exempts
/// light-mode results from this gate.
pub fn can_access_speech(session: Option<&UserSession>, now_ms: i64) -> bool {
    session.is_some_and(|s| s.has_premium_access(now_ms))
}

/// Map a denied check to the flow the caller should route to.
pub fn denial_reason(session: Option<&UserSession>) -> DenialReason {
    if session.is_none() {
        DenialReason::SignInRequired
    } else {
        DenialReason::PremiumRequired
    }
}
