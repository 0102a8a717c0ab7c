//! User Model

use serde::{Deserialize, Serialize};

use super::Role;

/// Authenticated user identity.
///
/// The service is backed by a document store and names its key `_id`;
/// both spellings are accepted, `id` is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}
