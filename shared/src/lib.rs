//! Shared types for the TableBook client
//!
//! Domain models and the request/response bodies of the reservation
//! service REST API.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{
    AuthResponse, CreateReservationRequest, ErrorBody, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest,
};
pub use models::{Reservation, ReservationSlot, ReservationStatus, Restaurant, Role, UserInfo};
