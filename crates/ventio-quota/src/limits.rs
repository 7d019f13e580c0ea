// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static daily limit table per tier and feature.
//!
//! Limits are policy, not state: they are compiled in and never persisted.

use ventio_core::Feature;

/// Free vs premium classification governing numeric limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    /// Classify from the persisted premium flag.
    pub fn from_premium(is_premium: bool) -> Self {
        if is_premium { Tier::Premium } else { Tier::Free }
    }
}

/// Daily call limit for a feature under a tier.
///
/// Free users get 5 generation calls and no speech calls per day; premium
/// users get 15 of each.
pub fn daily_limit(tier: Tier, feature: Feature) -> u32 {
    match (tier, feature) {
        (Tier::Free, Feature::Gpt) => 5,
        (Tier::Free, Feature::Tts) => 0,
        (Tier::Premium, _) => 15,
    }
}
