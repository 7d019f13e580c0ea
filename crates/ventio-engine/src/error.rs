// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestrator error surface.
//!
//! Denials are part of the normal control flow and carry enough structure
//! for the caller to route the user: sign-in prompt, upgrade prompt, or
//! quota notice. Backend failures arrive already normalized to a message
//! plus optional upstream status.

use thiserror::Error;
use ventio_core::{Feature, VentioError};
use ventio_quota::DenialReason;

/// Errors surfaced by the generation orchestrator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request needs a signed-in user.
    #[error("sign-in required")]
    SignInRequired,

    /// The request needs an active premium subscription.
    #[error("premium subscription required")]
    PremiumRequired,

    /// Today's limit for the feature is exhausted.
    #[error("daily limit reached for {feature}")]
    QuotaExceeded { feature: Feature },

    /// The backend call failed; message and status are upstream-derived.
    #[error("{message}")]
    Backend {
        message: String,
        status: Option<u16>,
    },

    /// Local persistence failed.
    #[error(transparent)]
    Storage(#[from] VentioError),
}

impl EngineError {
    /// Lift an access-policy denial into the matching error.
    pub fn from_denial(reason: DenialReason) -> Self {
        match reason {
            DenialReason::SignInRequired => EngineError::SignInRequired,
            DenialReason::PremiumRequired => EngineError::PremiumRequired,
        }
    }

    /// The dismissible notification text for this failure.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::SignInRequired => {
                "이 기능을 사용하려면 로그인이 필요합니다.".to_string()
            }
            EngineError::PremiumRequired => {
                "프리미엄 구독자만 이용할 수 있습니다.".to_string()
            }
            EngineError::QuotaExceeded { feature } => {
                format!(
                    "오늘의 {} 사용 한도를 초과했습니다.",
                    feature.to_string().to_uppercase()
                )
            }
            EngineError::Backend { message, .. } => message.clone(),
            EngineError::Storage(_) => "일시적인 오류가 발생했습니다. 다시 시도해주세요.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denials_map_to_the_right_variants() {
        assert!(matches!(
            EngineError::from_denial(DenialReason::SignInRequired),
            EngineError::SignInRequired
        ));
        assert!(matches!(
            EngineError::from_denial(DenialReason::PremiumRequired),
            EngineError::PremiumRequired
        ));
    }

    #[test]
    fn quota_message_names_the_feature_uppercase() {
        let err = EngineError::QuotaExceeded {
            feature: Feature::Gpt,
        };
        assert!(err.user_message().contains("GPT"));
        let err = EngineError::QuotaExceeded {
            feature: Feature::Tts,
        };
        assert!(err.user_message().contains("TTS"));
    }

    #[test]
    fn backend_message_passes_through() {
        let err = EngineError::Backend {
            message: "OpenAI API error: Rate limited".to_string(),
            status: Some(429),
        };
        assert_eq!(err.user_message(), "OpenAI API error: Rate limited");
    }
}
