// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auth state machine published by the watcher.

use std::sync::Arc;

use ventio_core::UserSession;

/// The current authentication state of the application.
///
/// Transitions: sign-in flows move `Anonymous -> Authenticating`, then the
/// provider's state stream lands in `Authenticated` (or the flow fails into
/// `Failed`); sign-out returns to `Anonymous`.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No session.
    Anonymous,
    /// A sign-in flow is in flight.
    Authenticating,
    /// A session exists.
    Authenticated(Arc<UserSession>),
    /// The last sign-in flow failed; carries the user-facing message.
    Failed(String),
}

impl AuthState {
    /// The session, when one exists.
    pub fn session(&self) -> Option<&Arc<UserSession>> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Whether a session exists.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventio_core::ProviderKind;

    #[test]
    fn session_accessor_only_on_authenticated() {
        assert!(AuthState::Anonymous.session().is_none());
        assert!(AuthState::Authenticating.session().is_none());
        assert!(AuthState::Failed("nope".into()).session().is_none());

        let session = Arc::new(UserSession {
            uid: "uid-1".into(),
            email: None,
            display_name: None,
            photo_url: None,
            provider: ProviderKind::Google,
            subscription: None,
        });
        let state = AuthState::Authenticated(session.clone());
        assert_eq!(state.session().unwrap().uid, "uid-1");
        assert!(state.is_authenticated());
    }
}
