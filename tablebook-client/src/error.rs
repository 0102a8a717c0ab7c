//! Client error types

use thiserror::Error;

use crate::storage::StorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the body's `error` field when present.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// 2xx response whose body is unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client-side validation failed, nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation needs a session and there is none
    #[error("Authentication required")]
    Unauthorized,

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Byte store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error (including malformed JSON bodies)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Server-provided error text, if the service sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// True when the service answered with a non-2xx status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }

    /// The single string consumers see in their `error` field.
    ///
    /// Server text wins verbatim. Otherwise a rejection (non-2xx) uses
    /// `rejected`, everything else (transport, malformed body) uses
    /// `transport`. Validation errors carry their own message.
    pub fn user_message(&self, rejected: &str, transport: &str) -> String {
        match self {
            ClientError::Api { message: Some(message), .. } if !message.is_empty() => {
                message.clone()
            }
            ClientError::Api { .. } => rejected.to_string(),
            ClientError::Validation(message) => message.clone(),
            ClientError::Unauthorized => "Authentication required".to_string(),
            _ => transport.to_string(),
        }
    }
}

/// Reservation workflow guard violation. Raised synchronously, nothing is
/// sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Slot {slot_id} does not belong to restaurant {restaurant_id}")]
    ForeignSlot {
        slot_id: String,
        restaurant_id: String,
    },

    #[error("No reservation slot selected")]
    NoSlotSelected,

    #[error("A reservation is already being submitted")]
    SubmissionInFlight,

    #[error("Reservation already completed")]
    Completed,

    #[error("Reservation workflow was abandoned")]
    Abandoned,
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
