//! Client-related types shared with the reservation service
//!
//! Request/response bodies of the REST endpoints the booking client calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ReservationStatus, Role, UserInfo};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login and register both answer with a usable session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub token: String,
}

/// POST /auth/forgot-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /auth/reset-password
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Failure body. Every field is optional because non-2xx responses are
/// failures regardless of their shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Reservation API DTOs
// =============================================================================

/// POST /api/add-reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    /// User id
    pub user: String,
    /// Restaurant id
    pub restaurant: String,
    pub date: DateTime<Utc>,
    pub status: ReservationStatus,
}
