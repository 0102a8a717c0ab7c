//! SessionManager - 会话管理
//!
//! Single writer of [`Session`]. Every mutation goes through
//! [`reduce`](super::reduce); storage work implied by a transition is handed
//! to the [`EffectRunner`] after the state is updated.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::{Role, UserInfo};
use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};
use crate::http::ReservationApi;

use super::effects::EffectRunner;
use super::forms::{ForgotPasswordForm, LoginForm, RegistrationForm, ResetPasswordForm};
use super::reducer::{SessionAction, effect_of, reduce};
use super::store::SessionStore;
use super::{AuthSession, Session};

/// Transport failure, malformed body, or anything that is not a service answer
pub const TRANSPORT_FAILED: &str = "An error occurred. Please try again.";
pub const LOGIN_FAILED: &str = "Login failed.";
pub const REGISTRATION_FAILED: &str = "Registration failed.";
pub const FORGOT_PASSWORD_FAILED: &str = "Failed to send reset email.";
pub const RESET_PASSWORD_FAILED: &str = "Failed to reset password.";
pub const PROFILE_FAILED: &str = "Failed to fetch user details";

/// Owns the session and mediates every auth operation.
///
/// Must be created inside a tokio runtime (the effect runner is spawned on
/// construction).
pub struct SessionManager {
    api: Arc<dyn ReservationApi>,
    store: SessionStore,
    state: watch::Sender<Session>,
    effects: EffectRunner,
    /// Bumped by every transition that writes storage (sign-in, logout)
    identity_version: AtomicU64,
}

impl SessionManager {
    pub fn new(api: Arc<dyn ReservationApi>, store: SessionStore) -> Self {
        let (state, _) = watch::channel(Session::new());
        let effects = EffectRunner::spawn(store.clone());
        Self {
            api,
            store,
            state,
            effects,
            identity_version: AtomicU64::new(0),
        }
    }

    /// Receiver notified after every session mutation.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: SessionAction) {
        self.dispatch_unless_changed(action, None);
    }

    /// Applies `action`, unless `since` is given and an identity write
    /// happened after it was read. Effects are queued under the state lock
    /// so storage sees them in transition order.
    fn dispatch_unless_changed(&self, action: SessionAction, since: Option<u64>) -> bool {
        let effect = effect_of(&action);
        let applied = self.state.send_if_modified(|state| {
            if since.is_some_and(|v| v != self.identity_version.load(Ordering::SeqCst)) {
                return false;
            }
            *state = reduce(state, &action);
            if let Some(effect) = effect {
                self.identity_version.fetch_add(1, Ordering::SeqCst);
                self.effects.run(effect);
            }
            true
        });
        if applied {
            tracing::debug!(?action, "Session updated");
        }
        applied
    }

    /// Waits for queued storage writes to land.
    pub async fn flush(&self) {
        self.effects.flush().await;
    }

    // ========== Rehydration ==========

    /// Loads the persisted session. Never fails: a missing, partial or
    /// unreadable record leaves the session signed out.
    ///
    /// A sign-in or logout that completes while the record is being read
    /// wins; the stale read is dropped.
    pub async fn rehydrate(&self) -> Session {
        let since = self.identity_version.load(Ordering::SeqCst);
        self.effects.flush().await;

        let restored = match self.store.load().await {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session, starting signed out");
                None
            }
        };

        match &restored {
            Some(auth) => tracing::info!(user_id = %auth.user.id, "Session restored"),
            None => tracing::debug!("No persisted session"),
        }

        if !self.dispatch_unless_changed(SessionAction::Rehydrated(restored), Some(since)) {
            tracing::debug!("Session changed while rehydrating, keeping it");
        }
        self.snapshot()
    }

    // ========== Login / Register / Logout ==========

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        let request = LoginForm { email, password }.validate()?;

        self.dispatch(SessionAction::AuthStarted);
        let result = self
            .api
            .login(&request)
            .await
            .and_then(AuthSession::try_from);
        self.finish_auth(result, LOGIN_FAILED)
    }

    /// Registration answers with a usable session, so success signs the
    /// user in exactly like [`login`](Self::login).
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> ClientResult<UserInfo> {
        let request = RegistrationForm {
            name,
            email,
            password,
            role,
        }
        .validate()?;

        self.dispatch(SessionAction::AuthStarted);
        let result = self
            .api
            .register(&request)
            .await
            .and_then(AuthSession::try_from);
        self.finish_auth(result, REGISTRATION_FAILED)
    }

    fn finish_auth(
        &self,
        result: ClientResult<AuthSession>,
        rejected: &str,
    ) -> ClientResult<UserInfo> {
        match result {
            Ok(auth) => {
                let user = auth.user.clone();
                tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
                self.dispatch(SessionAction::AuthSucceeded(auth));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Authentication failed");
                self.dispatch(SessionAction::AuthFailed(
                    e.user_message(rejected, TRANSPORT_FAILED),
                ));
                Err(e)
            }
        }
    }

    /// Clears the in-memory session immediately; the persisted record is
    /// removed in the background.
    pub fn logout(&self) {
        if let Some(user) = self.state.borrow().user() {
            tracing::info!(user_id = %user.id, "Signing out");
        }
        self.dispatch(SessionAction::LoggedOut);
    }

    // ========== Password recovery ==========

    /// Asks the service to email a reset token. Returns the service's
    /// acknowledgement text.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        let request = ForgotPasswordForm { email }.validate()?;
        let response = self.api.forgot_password(&request).await?;
        tracing::info!("Password reset email requested");
        Ok(response.message)
    }

    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> ClientResult<String> {
        let request = ResetPasswordForm {
            reset_token,
            new_password,
        }
        .validate()?;
        let response = self.api.reset_password(&request).await?;
        tracing::info!("Password reset completed");
        Ok(response.message)
    }

    // ========== Profile ==========

    /// Fetches the signed-in user's profile. Does not touch the session.
    pub async fn fetch_profile(&self) -> ClientResult<UserInfo> {
        let auth = self
            .state
            .borrow()
            .auth()
            .cloned()
            .ok_or(ClientError::Unauthorized)?;
        self.api
            .get_user(&auth.token, &auth.user.id)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    "{}",
                    e.user_message(PROFILE_FAILED, TRANSPORT_FAILED)
                );
            })
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.state.borrow())
            .finish()
    }
}
