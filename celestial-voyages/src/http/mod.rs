//! HTTP layer: Axum router, handlers, and responses.
//!
//! Exposes the catalog (`/api/destinations`, `/api/travel-classes`, ...),
//! account endpoints under `/api/auth`, trips, quotes and the booking wizard.

mod auth;
mod booking;
mod error;
mod handlers;
mod responses;
mod state;


pub use handlers::router;
pub use state::{AppState, SessionStore};
