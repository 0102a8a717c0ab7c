//! Session state
//!
//! [`Session`] is the one globally shared, mutable resource of the client.
//! Only [`SessionManager`] writes it; everyone else reads snapshots through
//! a watch receiver.
//!
//! A token never exists without its user: both live in one
//! [`AuthSession`], so the half-authenticated states cannot be built.

mod effects;
mod forms;
mod manager;
mod reducer;
mod store;

pub use effects::{EffectRunner, SessionEffect};
pub use forms::{ForgotPasswordForm, LoginForm, RegistrationForm, ResetPasswordForm};
pub use manager::{
    FORGOT_PASSWORD_FAILED, LOGIN_FAILED, PROFILE_FAILED, REGISTRATION_FAILED,
    RESET_PASSWORD_FAILED, SessionManager, TRANSPORT_FAILED,
};
pub use reducer::{SessionAction, effect_of, reduce};
pub use store::{SESSION_KEY, SessionStore, StoredSession};

use serde::{Deserialize, Serialize};
use shared::{AuthResponse, UserInfo};

use crate::error::ClientError;

/// User identity paired with its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: UserInfo,
    pub token: String,
}

impl AuthSession {
    /// Returns `None` for an empty token.
    pub fn new(user: UserInfo, token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            return None;
        }
        Some(Self { user, token })
    }
}

impl TryFrom<AuthResponse> for AuthSession {
    type Error = ClientError;

    fn try_from(response: AuthResponse) -> Result<Self, Self::Error> {
        AuthSession::new(response.user, response.token)
            .ok_or_else(|| ClientError::InvalidResponse("Missing session token".into()))
    }
}

/// In-memory session held by the running client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) auth: Option<AuthSession>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
}

impl Session {
    /// Empty session (process start, after logout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Session holding an authenticated identity.
    pub fn authenticated(auth: AuthSession) -> Self {
        Self {
            auth: Some(auth),
            ..Self::default()
        }
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
