// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness Tracker API Server
//!
//! Serves the monthly activity calendar over workouts, stretch sessions and
//! meditation sessions stored in Firestore.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_tracker::{
    config::Config, db::FirestoreDb, services::CalendarService, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Wellness Tracker API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id, &config.collection_prefix).await?;

    let calendar_service = CalendarService::with_firestore(db);
    tracing::info!("Calendar service initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        calendar_service,
    });

    // Build router
    let app = wellness_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wellness_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
