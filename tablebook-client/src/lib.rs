//! TableBook Client - session and reservation state for the booking app
//!
//! Owns the authentication session (persisted across restarts), routes
//! between the signed-out, user and admin areas, caches the restaurant
//! catalog, and drives the slot selection → reservation → payment flow
//! against the reservation service REST API.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod router;
pub mod session;
pub mod storage;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use app::BookingApp;
pub use catalog::{CatalogCache, CatalogState, filter_restaurants};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, WorkflowError};
pub use http::{NetworkHttpClient, ReservationApi};
pub use router::{AccessRouter, RootArea, route};
pub use session::{AuthSession, Session, SessionManager, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use workflow::{DraftStatus, PaymentHandoff, ReservationDraft, ReservationWorkflow, SubmitOutcome};

// Re-export shared types for convenience
pub use shared::{Reservation, ReservationSlot, Restaurant, Role, UserInfo};
