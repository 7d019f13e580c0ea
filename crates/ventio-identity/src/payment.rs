// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated premium purchase.
//!
//! There is no real payment processor behind this: after a simulated
//! processing delay the subscription directory receives a 30-day premium
//! record. The auth watcher picks the change up on the next session refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, warn};
use ventio_core::{Plan, Subscription, UserSession, VentioError};

use crate::provider::SubscriptionDirectory;

/// How long a purchased premium subscription lasts.
const PREMIUM_DURATION_DAYS: i64 = 30;

/// Simulated payment step that activates a premium subscription.
pub struct PaymentProcessor {
    directory: Arc<dyn SubscriptionDirectory>,
    processing_delay: Duration,
}

impl PaymentProcessor {
    /// Processor with the default simulated processing delay.
    pub fn new(directory: Arc<dyn SubscriptionDirectory>) -> Self {
        Self {
            directory,
            processing_delay: Duration::from_secs(2),
        }
    }

    /// Override the simulated delay (tests use zero).
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Run the simulated purchase for the signed-in user.
    ///
    /// Requires a session. Writes `{active, premium, now + 30 days}` to the
    /// subscription directory and returns the new record.
    pub async fn process_premium_subscription(
        &self,
        session: Option<&UserSession>,
    ) -> Result<Subscription, VentioError> {
        let session = session.ok_or_else(|| VentioError::Auth {
            message: "결제를 진행하려면 먼저 로그인해주세요.".to_string(),
            source: None,
        })?;

        // Stand-in for the real payment round trip.
        tokio::time::sleep(self.processing_delay).await;

        let expires_at = Utc::now() + ChronoDuration::days(PREMIUM_DURATION_DAYS);
        let subscription = Subscription {
            is_active: true,
            plan: Plan::Premium,
            expires_at: Some(expires_at.timestamp_millis()),
        };

        self.directory
            .update_subscription(&session.uid, &subscription)
            .await
            .inspect_err(|e| {
                warn!(uid = %session.uid, error = %e, "subscription update failed");
            })?;

        info!(uid = %session.uid, expires_at = %expires_at, "premium subscription activated");
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use ventio_core::ProviderKind;

    #[derive(Default)]
    struct RecordingDirectory {
        updates: Mutex<Vec<(String, Subscription)>>,
    }

    #[async_trait]
    impl SubscriptionDirectory for RecordingDirectory {
        async fn fetch_subscription(
            &self,
            _uid: &str,
        ) -> Result<Option<Subscription>, VentioError> {
            Ok(None)
        }

        async fn update_subscription(
            &self,
            uid: &str,
            subscription: &Subscription,
        ) -> Result<(), VentioError> {
            self.updates
                .lock()
                .unwrap()
                .push((uid.to_string(), subscription.clone()));
            Ok(())
        }
    }

    fn session() -> UserSession {
        UserSession {
            uid: "kakao:12345".to_string(),
            email: None,
            display_name: None,
            photo_url: None,
            provider: ProviderKind::Kakao,
            subscription: None,
        }
    }

    #[tokio::test]
    async fn purchase_requires_a_session() {
        let processor = PaymentProcessor::new(Arc::new(RecordingDirectory::default()))
            .with_processing_delay(Duration::ZERO);
        let err = processor.process_premium_subscription(None).await.unwrap_err();
        assert!(matches!(err, VentioError::Auth { .. }));
    }

    #[tokio::test]
    async fn purchase_writes_thirty_day_premium_record() {
        let directory = Arc::new(RecordingDirectory::default());
        let processor =
            PaymentProcessor::new(directory.clone()).with_processing_delay(Duration::ZERO);

        let before = Utc::now().timestamp_millis();
        let subscription = processor
            .process_premium_subscription(Some(&session()))
            .await
            .unwrap();
        let after = Utc::now().timestamp_millis();

        assert!(subscription.is_active);
        assert_eq!(subscription.plan, Plan::Premium);
        let expires = subscription.expires_at.unwrap();
        let thirty_days = PREMIUM_DURATION_DAYS * 24 * 60 * 60 * 1000;
        assert!(expires >= before + thirty_days && expires <= after + thirty_days);

        let updates = directory.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "kakao:12345");
        assert_eq!(updates[0].1, subscription);
    }
}
