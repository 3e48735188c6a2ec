//! Domain entities: users, the browseable catalogue, and booked trips.
//!
//! Relationships are plain integer ids. Nothing here enforces that a
//! referenced id exists; lookups happen when the data is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordHash;

pub type Id = u64;

/// Where a destination sits relative to Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationType {
    Orbital,
    Lunar,
    Planetary,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub preferences: serde_json::Value,
    pub password: PasswordHash,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub preferences: serde_json::Value,
    pub password: PasswordHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    pub image_url: String,
    /// Kilometres from Earth.
    pub distance: u64,
    /// Journey length in days.
    pub duration: u32,
    /// USD per traveler before the travel class multiplier.
    pub base_price: u64,
}

#[derive(Debug, Clone)]
pub struct NewDestination {
    pub name: String,
    pub description: String,
    pub kind: DestinationType,
    pub image_url: String,
    pub distance: u64,
    pub duration: u32,
    pub base_price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelClass {
    pub id: Id,
    pub name: String,
    pub description: String,
    /// Percentage of the destination base price, `100` meaning unchanged.
    pub price_multiplier: u32,
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewTravelClass {
    pub name: String,
    pub description: String,
    pub price_multiplier: u32,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub destination_id: Id,
    pub image_url: String,
    pub capacity: u32,
    /// Square metres.
    pub size: u32,
    pub price_per_night: u64,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewAccommodation {
    pub name: String,
    pub description: String,
    pub destination_id: Id,
    pub image_url: String,
    pub capacity: u32,
    pub size: u32,
    pub price_per_night: u64,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub destination_id: Id,
    pub image_url: String,
    /// Minutes.
    pub duration: u32,
    pub price: u64,
}

#[derive(Debug, Clone)]
pub struct NewExperience {
    pub name: String,
    pub description: String,
    pub destination_id: Id,
    pub image_url: String,
    pub duration: u32,
    pub price: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripStatus {
    #[default]
    Booked,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Id,
    pub user_id: Id,
    pub destination_id: Id,
    pub travel_class_id: Id,
    pub accommodation_id: Id,
    pub departure_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub total_price: u64,
    pub status: TripStatus,
    pub booked_experiences: Vec<Id>,
}

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub user_id: Id,
    pub destination_id: Id,
    pub travel_class_id: Id,
    pub accommodation_id: Id,
    pub departure_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub total_price: u64,
    pub status: TripStatus,
    pub booked_experiences: Vec<Id>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DestinationType, TripStatus};

    #[test]
    fn destination_type_uses_upper_case_tags() {
        assert_eq!(
            serde_json::to_value(DestinationType::Planetary).ok(),
            Some(json!("PLANETARY"))
        );
    }

    #[test]
    fn trip_status_uses_kebab_case_tags() {
        assert_eq!(
            serde_json::to_value(TripStatus::InProgress).ok(),
            Some(json!("in-progress"))
        );
        assert_eq!(TripStatus::default(), TripStatus::Booked);
    }
}
