//! Reservation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reservation record returned by the create endpoint.
///
/// Only the identifier is required; the service may populate `user` and
/// `restaurant` as nested documents, so they are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub restaurant: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_with_populated_refs() {
        let json = r#"{
            "_id": "res-1",
            "user": {"_id": "u-1", "name": "Ada"},
            "restaurant": "r-1",
            "date": "2026-11-02T19:00:00.000Z",
            "status": "confirmed"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.id, "res-1");
        assert_eq!(reservation.status.as_deref(), Some("confirmed"));
        assert!(reservation.date.is_some());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }
}
