//! Data models
//!
//! Shared between the booking client and anything else speaking to the
//! reservation service. IDs are opaque strings issued by the service.

pub mod reservation;
pub mod restaurant;
pub mod role;
pub mod user;

// Re-exports
pub use reservation::*;
pub use restaurant::*;
pub use role::*;
pub use user::*;
