//! Restaurant Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Bookable time slot, owned by exactly one [`Restaurant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSlot {
    #[serde(alias = "_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    /// Remaining seats. Advisory only, the service decides on submit.
    #[serde(alias = "slots", default)]
    pub capacity: u32,
}

/// Restaurant listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "image", default)]
    pub image_ref: Option<String>,
    #[serde(alias = "reservationSlots", default)]
    pub slots: Vec<ReservationSlot>,
    #[serde(alias = "admin", default, deserialize_with = "admin_id")]
    pub admin_id: Option<String>,
}

impl Restaurant {
    /// Looks up one of this restaurant's own slots.
    pub fn slot(&self, slot_id: &str) -> Option<&ReservationSlot> {
        self.slots.iter().find(|slot| slot.id == slot_id)
    }
}

/// The service either embeds the owning admin or sends only its id.
#[derive(Deserialize)]
#[serde(untagged)]
enum AdminRef {
    Id(String),
    Embedded {
        #[serde(alias = "_id")]
        id: String,
    },
}

fn admin_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let admin = Option::<AdminRef>::deserialize(deserializer)?;
    Ok(admin.map(|admin| match admin {
        AdminRef::Id(id) | AdminRef::Embedded { id } => id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_from_service_payload() {
        let json = r#"{
            "_id": "r-1",
            "name": "Little Italy",
            "location": "Downtown",
            "cuisine": "Italian",
            "description": "Pasta",
            "image": null,
            "reservationSlots": [
                {"_id": "s-1", "date": "2026-11-02T19:00:00.000Z", "slots": 4},
                {"_id": "s-2", "date": "2026-11-02T21:00:00.000Z", "slots": 0}
            ],
            "admin": {"_id": "a-1", "name": "Owner", "email": "owner@example.com"}
        }"#;

        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.id, "r-1");
        assert_eq!(restaurant.image_ref, None);
        assert_eq!(restaurant.slots.len(), 2);
        assert_eq!(restaurant.slots[0].capacity, 4);
        assert_eq!(restaurant.slot("s-2").map(|s| s.capacity), Some(0));
        assert_eq!(restaurant.admin_id.as_deref(), Some("a-1"));
    }

    #[test]
    fn test_restaurant_admin_as_plain_id() {
        let json = r#"{"id":"r-2","name":"Taqueria","admin":"a-9"}"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.admin_id.as_deref(), Some("a-9"));
        assert!(restaurant.slots.is_empty());
        assert!(restaurant.slot("s-1").is_none());
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let json = r#"{"_id":"s-1","date":"2026-11-02T19:00:00Z","slots":-1}"#;
        assert!(serde_json::from_str::<ReservationSlot>(json).is_err());
    }
}
