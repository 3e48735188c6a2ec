use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::GlobalKeyExtractor,
    GovernorLayer,
};
use tracing::{debug, info, warn};

use crate::auth::{validate_login, validate_registration, PasswordHash};
use crate::model::{Accommodation, Destination, Experience, NewUser, TravelClass};
use crate::pricing::{fare_matrix, FareRow};
use crate::wizard::{departure_options, DepartureOption};

use super::auth::{expired_session_cookie, require_user, session_cookie, SESSION_COOKIE};
use super::booking::{booking_state, booking_step, create_trip, list_trips, quote, trip_by_id};
use super::error::ApiError;
use super::responses::{
    json_body, parse_id, DestinationFilter, HealthResponse, LoginRequest, MessageResponse,
    RegisterRequest, UserProfile,
};
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(20)
            .burst_size(50)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .unwrap_or_else(|| unreachable!("static governor config is valid")),
    );

    Router::new()
        .route("/health", get(health))
        .route("/api/destinations", get(destinations))
        .route("/api/destinations/{id}", get(destination))
        .route("/api/destinations/{id}/departures", get(departures))
        .route("/api/travel-classes", get(travel_classes))
        .route("/api/travel-classes/{id}", get(travel_class))
        .route("/api/accommodations", get(accommodations))
        .route("/api/accommodations/{id}", get(accommodation))
        .route("/api/experiences", get(experiences))
        .route("/api/experiences/{id}", get(experience))
        .route("/api/pricing", get(pricing))
        .route("/api/booking", get(booking_state))
        .route("/api/booking/quote", get(quote))
        .route("/api/booking/step", post(booking_step))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/user", get(current_user))
        .route("/api/trips", get(list_trips).post(create_trip))
        .route("/api/trips/{id}", get(trip_by_id))
        .layer(GovernorLayer::new(governor_conf))
        .layer(tower_http::request_id::PropagateRequestIdLayer::new(
            axum::http::header::HeaderName::from_static("x-request-id"),
        ))
        .layer(
            tower_http::request_id::SetRequestIdLayer::new(
                axum::http::header::HeaderName::from_static("x-request-id"),
                tower_http::request_id::MakeRequestUuid::default(),
            ),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let destinations = state.store.read().await.destination_count();
    Json(HealthResponse {
        status: "ok",
        destinations,
        active_sessions: state.sessions.len(),
    })
}

async fn destinations(State(state): State<AppState>) -> Json<Vec<Destination>> {
    let destinations = state.store.read().await.destinations();
    debug!(count = destinations.len(), "destinations requested");
    Json(destinations)
}

async fn destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, ApiError> {
    let id = parse_id(&id, "Destination")?;
    let store = state.store.read().await;
    let destination = store.destination(id).ok_or(ApiError::NotFound("Destination"))?;
    Ok(Json(destination.clone()))
}

async fn departures(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DepartureOption>>, ApiError> {
    let id = parse_id(&id, "Destination")?;
    let kind = state
        .store
        .read()
        .await
        .destination(id)
        .map(|destination| destination.kind)
        .ok_or(ApiError::NotFound("Destination"))?;
    Ok(Json(departure_options(kind, Utc::now().date_naive())))
}

async fn travel_classes(State(state): State<AppState>) -> Json<Vec<TravelClass>> {
    Json(state.store.read().await.travel_classes())
}

async fn travel_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TravelClass>, ApiError> {
    let id = parse_id(&id, "Travel class")?;
    let store = state.store.read().await;
    let travel_class = store.travel_class(id).ok_or(ApiError::NotFound("Travel class"))?;
    Ok(Json(travel_class.clone()))
}

async fn accommodations(
    State(state): State<AppState>,
    Query(filter): Query<DestinationFilter>,
) -> Json<Vec<Accommodation>> {
    let store = state.store.read().await;
    let accommodations = match filter.destination_id {
        Some(destination_id) => store.accommodations_for(destination_id),
        None => store.accommodations(),
    };
    debug!(
        destination_id = ?filter.destination_id,
        count = accommodations.len(),
        "accommodations requested"
    );
    Json(accommodations)
}

async fn accommodation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Accommodation>, ApiError> {
    let id = parse_id(&id, "Accommodation")?;
    let store = state.store.read().await;
    let accommodation = store
        .accommodation(id)
        .ok_or(ApiError::NotFound("Accommodation"))?;
    Ok(Json(accommodation.clone()))
}

async fn experiences(
    State(state): State<AppState>,
    Query(filter): Query<DestinationFilter>,
) -> Json<Vec<Experience>> {
    let store = state.store.read().await;
    let experiences = match filter.destination_id {
        Some(destination_id) => store.experiences_for(destination_id),
        None => store.experiences(),
    };
    debug!(
        destination_id = ?filter.destination_id,
        count = experiences.len(),
        "experiences requested"
    );
    Json(experiences)
}

async fn experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Experience>, ApiError> {
    let id = parse_id(&id, "Experience")?;
    let store = state.store.read().await;
    let experience = store.experience(id).ok_or(ApiError::NotFound("Experience"))?;
    Ok(Json(experience.clone()))
}

async fn pricing(State(state): State<AppState>) -> Result<Json<Vec<FareRow>>, ApiError> {
    let store = state.store.read().await;
    let rows = fare_matrix(&store.destinations(), &store.travel_classes())?;
    Ok(Json(rows))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserProfile>), ApiError> {
    let request = json_body(payload)?;
    validate_login(&request.username, &request.password)?;

    let profile = {
        let store = state.store.read().await;
        let Some(user) = store.user_by_username(&request.username) else {
            warn!(username = %request.username, "login with unknown username");
            return Err(ApiError::Unauthorized("Incorrect username."));
        };
        if !user.password.verify(&request.password) {
            warn!(user_id = user.id, "login with incorrect password");
            return Err(ApiError::Unauthorized("Incorrect password."));
        }
        UserProfile::from(user)
    };

    let token = state.sessions.create(profile.id);
    info!(user_id = profile.id, "user logged in");
    Ok((jar.add(session_cookie(&state, token)), Json(profile)))
}

async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>), ApiError> {
    let request = json_body(payload)?;
    validate_registration(
        &request.username,
        &request.password,
        &request.email,
        &request.full_name,
    )?;

    let user = state.store.write().await.create_user(NewUser {
        username: request.username,
        email: request.email,
        full_name: request.full_name,
        preferences: request
            .preferences
            .unwrap_or_else(|| serde_json::json!({})),
        password: PasswordHash::new(&request.password),
    })?;

    let token = state.sessions.create(user.id);
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&state, token)),
        Json(UserProfile::from(&user)),
    ))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
        debug!("session removed");
    }
    (
        jar.remove(expired_session_cookie()),
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

async fn current_user(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let user = require_user(&state, &jar, &headers)
        .await
        .map_err(|_| ApiError::Unauthorized("Not authenticated"))?;
    Ok(Json(UserProfile::from(&user)))
}
