// tablebook-client/src/session/store.rs
// 会话持久化 - 固定 key 下的 JSON 记录

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::UserInfo;

use crate::error::ClientResult;
use crate::storage::KeyValueStore;

use super::AuthSession;

/// Key of the single persisted session record
pub const SESSION_KEY: &str = "auth";

/// On-disk shape: `{ "user": {...}, "token": "..." }`.
///
/// Both fields are optional here so a half-written or hand-edited record
/// still parses; [`StoredSession::into_auth`] decides whether it is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub token: Option<String>,
}

impl StoredSession {
    pub fn into_auth(self) -> Option<AuthSession> {
        match (self.user, self.token) {
            (Some(user), Some(token)) => AuthSession::new(user, token),
            _ => None,
        }
    }
}

impl From<&AuthSession> for StoredSession {
    fn from(auth: &AuthSession) -> Self {
        Self {
            user: Some(auth.user.clone()),
            token: Some(auth.token.clone()),
        }
    }
}

/// Persistent session store over a byte store.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Reads the stored session. `Ok(None)` when there is no record or the
    /// record does not hold both a user and a token.
    pub async fn load(&self) -> ClientResult<Option<AuthSession>> {
        let Some(bytes) = self.backend.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        let stored: StoredSession = serde_json::from_slice(&bytes)?;
        Ok(stored.into_auth())
    }

    pub async fn save(&self, auth: &AuthSession) -> ClientResult<()> {
        let bytes = serde_json::to_vec(&StoredSession::from(auth))?;
        self.backend.set(SESSION_KEY, bytes).await?;
        Ok(())
    }

    pub async fn clear(&self) -> ClientResult<()> {
        self.backend.remove(SESSION_KEY).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("key", &SESSION_KEY).finish()
    }
}
