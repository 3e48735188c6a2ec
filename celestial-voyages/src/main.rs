//! # celestial-voyages
//!
//! Booking backend for commercial space tourism.
//!
//! Serves the destination catalog, prices trips and walks travelers through
//! a five-step booking wizard, keeping everything in memory.
//!
//! ## Architecture
//!
//! - **Store**: In-memory tables for users, catalog entries and trips, seeded on startup
//! - **Pricing**: Fare, stay and experience totals with checked integer arithmetic
//! - **Wizard**: Step gating, login redirect and trip drafting for the booking flow
//! - **HTTP**: Axum router with cookie sessions, rate limiting, request IDs, and graceful shutdown

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

mod auth;
mod config;
mod http;
mod model;
mod pricing;
mod seed;
mod store;
mod wizard;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::serve;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Cli};
use crate::http::{router, AppState, SessionStore};
use crate::seed::seed_catalog;
use crate::store::MemStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().context("failed to initialize logging")?;

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli).context("failed to load configuration")?;
    info!(
        bind = %config.bind,
        session_ttl = %humantime::format_duration(config.session_ttl),
        session_sweep_interval = %humantime::format_duration(config.session_sweep_interval),
        seed_catalog = config.seed_catalog,
        secure_cookies = config.secure_cookies,
        "configuration loaded"
    );

    let mut store = MemStore::new();
    if config.seed_catalog {
        seed_catalog(&mut store);
        info!(destinations = store.destination_count(), "catalog seeded");
    }

    let sessions = SessionStore::new(config.session_ttl);
    spawn_session_sweeper(sessions.clone(), config.session_sweep_interval);

    let state = AppState::new(store, sessions, config.secure_cookies);

    let app = router(state);
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    if config.bind.ip().is_loopback() {
        tracing::warn!(
            bind = %config.bind,
            "binding to loopback; use --bind 0.0.0.0:5000 for LAN access"
        );
    }

    let shutdown = tokio::signal::ctrl_c();
    info!(bind = %config.bind, "celestial-voyages listening");

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = shutdown.await;
        info!("shutting down gracefully");
    })
    .await
    .context("server exited with error")
}

/// Initialize tracing subscriber with `RUST_LOG` env filter (default: `info`).
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

/// Spawns a background task that drops expired sessions on every tick.
fn spawn_session_sweeper(sessions: SessionStore, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                info!(purged, remaining = sessions.len(), "expired sessions purged");
            } else {
                debug!("no expired sessions");
            }
        }
    });
}
