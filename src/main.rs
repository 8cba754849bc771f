// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge Worker Server
//!
//! Receives activity events from a Pub/Sub push subscription and grants
//! achievement badges.

use badge_worker::{
    config::Config,
    db::FirestoreDb,
    services::{catalogue, BadgeEngine},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Badge Worker");

    // A broken catalogue is a programming error; refuse to start.
    catalogue::validate(catalogue::RULES).expect("Badge rule catalogue is invalid");
    tracing::info!(rules = catalogue::RULES.len(), "Badge rule catalogue loaded");

    // Initialize Firestore database
    let db = Arc::new(
        FirestoreDb::new(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
    );

    let engine = BadgeEngine::new(db.clone(), db);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        engine,
    });

    // Build router
    let app = badge_worker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("badge_worker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
