//! Pure session transitions
//!
//! `reduce` computes the next [`Session`]; `effect_of` names the storage
//! work an action implies. Neither performs I/O.

use super::effects::SessionEffect;
use super::{AuthSession, Session};

/// Everything that may change the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Login or register request sent
    AuthStarted,
    /// Login or register succeeded
    AuthSucceeded(AuthSession),
    /// Login or register failed, with the message to surface
    AuthFailed(String),
    LoggedOut,
    /// Startup read of the persistent store finished
    Rehydrated(Option<AuthSession>),
}

pub fn reduce(state: &Session, action: &SessionAction) -> Session {
    match action {
        SessionAction::AuthStarted => Session {
            auth: state.auth.clone(),
            is_loading: true,
            error: None,
        },
        SessionAction::AuthSucceeded(auth) => Session {
            auth: Some(auth.clone()),
            is_loading: false,
            error: None,
        },
        // Identity is untouched: a failed attempt never exposes a partial session
        SessionAction::AuthFailed(message) => Session {
            auth: state.auth.clone(),
            is_loading: false,
            error: Some(message.clone()),
        },
        SessionAction::LoggedOut => Session {
            auth: None,
            is_loading: state.is_loading,
            error: None,
        },
        // Only the identity comes from storage; an attempt already running
        // keeps its loading flag and message
        SessionAction::Rehydrated(auth) => Session {
            auth: auth.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
        },
    }
}

pub fn effect_of(action: &SessionAction) -> Option<SessionEffect> {
    match action {
        SessionAction::AuthSucceeded(auth) => Some(SessionEffect::Persist(auth.clone())),
        SessionAction::LoggedOut => Some(SessionEffect::Clear),
        SessionAction::AuthStarted
        | SessionAction::AuthFailed(_)
        | SessionAction::Rehydrated(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Role, UserInfo};

    fn auth(id: &str, token: &str) -> AuthSession {
        AuthSession::new(
            UserInfo {
                id: id.into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                role: Role::User,
            },
            token,
        )
        .unwrap()
    }

    fn invariant_holds(session: &Session) -> bool {
        session.user().is_none() == session.token().is_none()
    }

    #[test]
    fn test_login_lifecycle() {
        let started = reduce(&Session::new(), &SessionAction::AuthStarted);
        assert!(started.is_loading());
        assert!(started.error().is_none());
        assert!(!started.is_authenticated());

        let done = reduce(&started, &SessionAction::AuthSucceeded(auth("u-1", "t-1")));
        assert!(!done.is_loading());
        assert_eq!(done.token(), Some("t-1"));
    }

    #[test]
    fn test_failure_keeps_previous_identity() {
        let signed_in = Session::authenticated(auth("u-1", "t-1"));
        let retry = reduce(&signed_in, &SessionAction::AuthStarted);
        let failed = reduce(&retry, &SessionAction::AuthFailed("Invalid credentials".into()));

        assert_eq!(failed.token(), Some("t-1"));
        assert_eq!(failed.error(), Some("Invalid credentials"));
        assert!(!failed.is_loading());
    }

    #[test]
    fn test_started_clears_previous_error() {
        let failed = reduce(&Session::new(), &SessionAction::AuthFailed("boom".into()));
        let again = reduce(&failed, &SessionAction::AuthStarted);
        assert!(again.error().is_none());
    }

    #[test]
    fn test_logout_and_empty_rehydrate_reset() {
        let signed_in = Session::authenticated(auth("u-1", "t-1"));
        let out = reduce(&signed_in, &SessionAction::LoggedOut);
        assert!(!out.is_authenticated());

        let restored = reduce(&out, &SessionAction::Rehydrated(None));
        assert_eq!(restored, Session::new());
    }

    #[test]
    fn test_rehydrate_replaces_identity_only() {
        let pending = reduce(&Session::new(), &SessionAction::AuthStarted);
        let restored = reduce(&pending, &SessionAction::Rehydrated(Some(auth("u-1", "t-1"))));
        assert_eq!(restored.token(), Some("t-1"));
        assert!(restored.is_loading());

        let failed = reduce(&restored, &SessionAction::AuthFailed("nope".into()));
        let again = reduce(&failed, &SessionAction::Rehydrated(None));
        assert!(!again.is_authenticated());
        assert_eq!(again.error(), Some("nope"));
    }

    #[test]
    fn test_invariant_over_action_sequences() {
        let actions = [
            SessionAction::AuthStarted,
            SessionAction::AuthFailed("nope".into()),
            SessionAction::AuthSucceeded(auth("u-1", "t-1")),
            SessionAction::Rehydrated(None),
            SessionAction::Rehydrated(Some(auth("u-2", "t-2"))),
            SessionAction::AuthStarted,
            SessionAction::LoggedOut,
            SessionAction::AuthSucceeded(auth("u-3", "t-3")),
            SessionAction::AuthFailed("late".into()),
        ];

        let mut state = Session::new();
        for action in &actions {
            state = reduce(&state, action);
            assert!(invariant_holds(&state), "after {action:?}");
        }
        assert_eq!(state.token(), Some("t-3"));
    }

    #[test]
    fn test_effects() {
        assert_eq!(
            effect_of(&SessionAction::AuthSucceeded(auth("u-1", "t-1"))),
            Some(SessionEffect::Persist(auth("u-1", "t-1")))
        );
        assert_eq!(effect_of(&SessionAction::LoggedOut), Some(SessionEffect::Clear));
        assert_eq!(effect_of(&SessionAction::AuthStarted), None);
        assert_eq!(effect_of(&SessionAction::AuthFailed("x".into())), None);
        assert_eq!(effect_of(&SessionAction::Rehydrated(Some(auth("u", "t")))), None);
    }
}
