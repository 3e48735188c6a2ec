use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Id, Trip, TripStatus, User};
use crate::pricing::{format_usd, Quote};
use crate::wizard::{Selection, Step};

use super::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub destinations: usize,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Public view of an account; credentials never leave the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub preferences: serde_json::Value,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            preferences: user.preferences.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationFilter {
    pub destination_id: Option<Id>,
}

/// Body of `POST /api/trips`. Any `userId` sent by the client is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub destination_id: Id,
    pub travel_class_id: Id,
    pub accommodation_id: Id,
    pub departure_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub total_price: u64,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub booked_experiences: Vec<Id>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteQuery {
    pub destination: Option<Id>,
    pub class: Option<Id>,
    pub accommodation: Option<Id>,
    /// Comma-separated experience ids.
    pub experiences: Option<String>,
    pub travelers: Option<u32>,
}

impl QuoteQuery {
    pub fn experience_ids(&self) -> Result<Vec<Id>, ApiError> {
        let Some(raw) = self.experiences.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<Id>()
                    .map_err(|_| ApiError::Validation(format!("Invalid experience id: {part}")))
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedQuote {
    pub base_fare: String,
    pub accommodation_cost: String,
    pub experiences_cost: String,
    pub per_traveler: String,
    pub total_price: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub formatted: FormattedQuote,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            formatted: FormattedQuote {
                base_fare: format_usd(quote.base_fare),
                accommodation_cost: format_usd(quote.accommodation_cost),
                experiences_cost: format_usd(quote.experiences_cost),
                per_traveler: format_usd(quote.per_traveler),
                total_price: format_usd(quote.total_price),
            },
            quote,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    #[default]
    Next,
    Back,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: Step,
    #[serde(default)]
    pub action: StepAction,
    #[serde(default)]
    pub selection: Selection,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepOutcome {
    Moved { query: String },
    LoginRequired { location: String },
    Booked { location: String, trip: Trip },
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step: Step,
    pub selection: Selection,
    pub quote: QuoteResponse,
    pub outcome: StepOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStateResponse {
    pub step: Step,
    pub selection: Selection,
    pub booking_url: String,
    pub quote: QuoteResponse,
}

/// Unwraps a JSON body, turning malformed input into a 400 with the reason.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

pub fn parse_id(raw: &str, entity: &'static str) -> Result<Id, ApiError> {
    raw.trim().parse::<Id>().map_err(|_| ApiError::NotFound(entity))
}
