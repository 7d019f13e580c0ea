// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation orchestrator.
//!
//! Every operation runs the same gauntlet: access policy over the current
//! session snapshot, then usage accounting, then the backend call. Session
//! reads are snapshots of the auth watcher's channel, not locked views --
//! a session change mid-operation applies to the next call.

use std::str::FromStr;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};
use ventio_core::{Feature, Mode, UserSession, Voice};
use ventio_identity::AuthState;
use ventio_quota::{can_access_mode, can_access_speech, denial_reason, UsageLedger};
use ventio_store::models::HistoryEntry;
use ventio_store::queries::history;
use ventio_store::{Database, ANONYMOUS_OWNER};

use crate::backend::BackendClient;
use crate::error::EngineError;

/// Orchestrates generation and synthesis behind policy and quota gates.
pub struct Engine {
    auth: watch::Receiver<AuthState>,
    ledger: UsageLedger,
    db: Database,
    backend: BackendClient,
}

impl Engine {
    /// Build an engine over the auth watcher's state channel, the usage
    /// ledger, the local database, and the backend client.
    pub fn new(
        auth: watch::Receiver<AuthState>,
        ledger: UsageLedger,
        db: Database,
        backend: BackendClient,
    ) -> Self {
        Self {
            auth,
            ledger,
            db,
            backend,
        }
    }

    /// Snapshot of the current session.
    fn session(&self) -> Option<std::sync::Arc<UserSession>> {
        self.auth.borrow().session().cloned()
    }

    /// History owner key for the current session.
    fn owner(&self) -> String {
        self.session()
            .map(|s| s.uid.clone())
            .unwrap_or_else(|| ANONYMOUS_OWNER.to_string())
    }

    /// Generate an expression for a situation under the given mode.
    ///
    /// Gate order: mode access, then usage accounting, then dispatch. A
    /// policy denial therefore never moves the usage counter. On success
    /// the result is appended to the owner's history.
    pub async fn generate(&self, user_input: &str, mode: &str) -> Result<String, EngineError> {
        let session = self.session();
        let session_ref = session.as_deref();
        let now = Utc::now().timestamp_millis();

        if !can_access_mode(mode, session_ref, now) {
            let reason = denial_reason(session_ref);
            info!(mode, ?reason, "generation denied by access policy");
            return Err(EngineError::from_denial(reason));
        }

        if !self.ledger.record_and_check(Feature::Gpt).await? {
            info!(mode, "generation denied by usage limit");
            return Err(EngineError::QuotaExceeded {
                feature: Feature::Gpt,
            });
        }

        let text = self.backend.generate(user_input, mode).await?;

        let owner = self.owner();
        history::append(&self.db, &owner, user_input, mode, &text).await?;
        debug!(%owner, mode, "generation stored to history");
        Ok(text)
    }

    /// Synthesize speech for a generated result.
    ///
    /// Speech is premium-gated, except for light-mode results. Quota runs
    /// after the access check, against the `tts` counter.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        mode: &str,
    ) -> Result<Vec<u8>, EngineError> {
        let session = self.session();
        let session_ref = session.as_deref();
        let now = Utc::now().timestamp_millis();

        let light_mode = Mode::from_str(mode) == Ok(Mode::Light);
        if !light_mode && !can_access_speech(session_ref, now) {
            let reason = denial_reason(session_ref);
            info!(mode, ?reason, "synthesis denied by access policy");
            return Err(EngineError::from_denial(reason));
        }

        if !self.ledger.record_and_check(Feature::Tts).await? {
            info!(mode, "synthesis denied by usage limit");
            return Err(EngineError::QuotaExceeded {
                feature: Feature::Tts,
            });
        }

        self.backend.synthesize(text, voice).await
    }

    /// Calls left today for a feature.
    pub async fn remaining_usage(&self, feature: Feature) -> Result<u32, EngineError> {
        Ok(self.ledger.remaining(feature).await?)
    }

    /// The current owner's history, newest first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, EngineError> {
        Ok(history::list(&self.db, &self.owner()).await?)
    }

    /// Remove one history entry. Returns whether it existed.
    pub async fn delete_history_entry(&self, id: &str) -> Result<bool, EngineError> {
        Ok(history::delete(&self.db, &self.owner(), id).await?)
    }

    /// Remove all of the current owner's history.
    pub async fn clear_history(&self) -> Result<(), EngineError> {
        Ok(history::clear(&self.db, &self.owner()).await?)
    }
}
