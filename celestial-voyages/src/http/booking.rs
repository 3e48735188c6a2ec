//! Trip records, price quotes and the booking wizard endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, warn};

use crate::model::{Id, NewTrip, Trip};
use crate::pricing::{self, PriceInputs, Quote};
use crate::store::MemStore;
use crate::wizard::{trip_draft, Selection, Transition, Wizard, WizardError};

use super::auth::{current_user, require_user};
use super::error::ApiError;
use super::responses::{
    json_body, parse_id, BookingStateResponse, CreateTripRequest, QuoteQuery, QuoteResponse,
    StepAction, StepOutcome, StepRequest, StepResponse,
};
use super::state::AppState;

/// Prices a selection against the catalog. Without a destination and class
/// there is nothing to price yet and an empty quote comes back.
fn price_selection(
    store: &MemStore,
    destination_id: Option<Id>,
    travel_class_id: Option<Id>,
    accommodation_id: Option<Id>,
    experience_ids: &[Id],
    travelers: u32,
) -> Result<Quote, ApiError> {
    let travelers = pricing::validate_travelers(travelers)?;
    let (Some(destination_id), Some(travel_class_id)) = (destination_id, travel_class_id) else {
        return Ok(Quote::empty(travelers));
    };

    let destination = store
        .destination(destination_id)
        .ok_or(ApiError::NotFound("Destination"))?;
    let travel_class = store
        .travel_class(travel_class_id)
        .ok_or(ApiError::NotFound("Travel class"))?;
    let accommodation = accommodation_id
        .map(|id| store.accommodation(id).ok_or(ApiError::NotFound("Accommodation")))
        .transpose()?;
    let experiences = experience_ids
        .iter()
        .map(|id| store.experience(*id).ok_or(ApiError::NotFound("Experience")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pricing::quote(&PriceInputs {
        destination,
        travel_class,
        accommodation,
        experiences,
        travelers,
    })?)
}

fn quote_selection(store: &MemStore, selection: &Selection) -> Result<Quote, ApiError> {
    price_selection(
        store,
        selection.destination_id,
        selection.travel_class_id,
        selection.accommodation_id,
        &selection.experience_ids,
        selection.travelers,
    )
}

pub async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let experience_ids = query.experience_ids()?;
    let store = state.store.read().await;
    let quote = price_selection(
        &store,
        query.destination,
        query.class,
        query.accommodation,
        &experience_ids,
        query.travelers.unwrap_or(1),
    )?;
    debug!(total_price = quote.total_price, "quote computed");
    Ok(Json(quote.into()))
}

/// Restores a wizard from a shared booking URL query; always starts at step one.
pub async fn booking_state(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<BookingStateResponse>, ApiError> {
    let wizard = Wizard::new(Selection::from_query(query.as_deref().unwrap_or_default()));
    let quote = quote_selection(&*state.store.read().await, wizard.selection())?;
    let step = wizard.step();
    let selection = wizard.into_selection();
    Ok(Json(BookingStateResponse {
        step,
        booking_url: selection.booking_url(),
        selection,
        quote: quote.into(),
    }))
}

pub async fn booking_step(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    payload: Result<Json<StepRequest>, JsonRejection>,
) -> Result<Json<StepResponse>, ApiError> {
    let request = json_body(payload)?;
    let user = current_user(&state, &jar, &headers).await;
    let mut wizard = Wizard::resume(request.step, request.selection);

    let transition = match request.action {
        StepAction::Back => {
            let step = wizard.back();
            Transition::Moved {
                step,
                query: wizard.selection().to_query(),
            }
        }
        StepAction::Next => wizard.advance(user.is_some())?,
    };

    let (quote, outcome) = match transition {
        Transition::Moved { query, .. } => {
            let quote = quote_selection(&*state.store.read().await, wizard.selection())?;
            (quote, StepOutcome::Moved { query })
        }
        Transition::LoginRequired { redirect } => {
            info!(location = %redirect, "booking requires login");
            let quote = quote_selection(&*state.store.read().await, wizard.selection())?;
            (quote, StepOutcome::LoginRequired { location: redirect })
        }
        Transition::Submit => {
            let user = user.ok_or(ApiError::Unauthorized("Unauthorized"))?;
            let mut store = state.store.write().await;
            let quote = quote_selection(&store, wizard.selection())?;
            let destination_id = wizard
                .selection()
                .destination_id
                .ok_or(WizardError::MissingDestination)?;
            let destination = store
                .destination(destination_id)
                .ok_or(ApiError::NotFound("Destination"))?;
            let draft = trip_draft(wizard.selection(), user.id, destination, &quote)?;
            let trip = store.create_trip(draft);
            info!(
                trip_id = trip.id,
                user_id = user.id,
                total_price = trip.total_price,
                "trip booked"
            );
            (
                quote,
                StepOutcome::Booked {
                    location: format!("/trips/{}", trip.id),
                    trip,
                },
            )
        }
    };

    Ok(Json(StepResponse {
        step: wizard.step(),
        quote: quote.into(),
        outcome,
        selection: wizard.into_selection(),
    }))
}

pub async fn list_trips(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<Vec<Trip>>, ApiError> {
    let user = require_user(&state, &jar, &headers).await?;
    Ok(Json(state.store.read().await.trips_for_user(user.id)))
}

pub async fn trip_by_id(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let user = require_user(&state, &jar, &headers).await?;
    let id = parse_id(&id, "Trip")?;
    let store = state.store.read().await;
    let trip = store.trip(id).ok_or(ApiError::NotFound("Trip"))?;
    if trip.user_id != user.id {
        warn!(trip_id = id, user_id = user.id, "trip belongs to another user");
        return Err(ApiError::Forbidden);
    }
    Ok(Json(trip.clone()))
}

pub async fn create_trip(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    let user = require_user(&state, &jar, &headers).await?;
    let request = json_body(payload)?;
    if request.return_date < request.departure_date {
        return Err(ApiError::Validation(String::from(
            "Return date must not be before departure date",
        )));
    }

    let trip = state.store.write().await.create_trip(NewTrip {
        user_id: user.id,
        destination_id: request.destination_id,
        travel_class_id: request.travel_class_id,
        accommodation_id: request.accommodation_id,
        departure_date: request.departure_date,
        return_date: request.return_date,
        total_price: request.total_price,
        status: request.status,
        booked_experiences: request.booked_experiences,
    });
    info!(trip_id = trip.id, user_id = user.id, "trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}
