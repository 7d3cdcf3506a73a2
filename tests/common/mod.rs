// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use std::sync::Arc;
use wellness_tracker::config::Config;
use wellness_tracker::db::FirestoreDb;
use wellness_tracker::middleware::auth::create_jwt;
use wellness_tracker::models::calendar::ActivityKind;
use wellness_tracker::routes::create_router;
use wellness_tracker::services::{ActivityRecord, CalendarService, InMemorySource};
use wellness_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection with an isolated collection prefix.
#[allow(dead_code)]
pub async fn test_db(prefix: &str) -> FirestoreDb {
    FirestoreDb::new("test-project", prefix)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Activity records for each source of a test app.
#[allow(dead_code)]
#[derive(Default)]
pub struct Fixtures {
    pub workouts: Vec<ActivityRecord>,
    pub stretches: Vec<ActivityRecord>,
    pub meditations: Vec<ActivityRecord>,
}

/// Create a test app backed by in-memory sources.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(fixtures: Fixtures) -> (axum::Router, Arc<AppState>) {
    let calendar_service = CalendarService::new(
        Arc::new(InMemorySource::new(ActivityKind::Workout, fixtures.workouts)),
        Arc::new(InMemorySource::new(ActivityKind::Stretch, fixtures.stretches)),
        Arc::new(InMemorySource::new(
            ActivityKind::Meditation,
            fixtures.meditations,
        )),
    );
    create_test_app_with_service(calendar_service)
}

/// Create a test app around an arbitrary calendar service.
#[allow(dead_code)]
pub fn create_test_app_with_service(
    calendar_service: CalendarService,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        calendar_service,
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose database is offline.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_service(CalendarService::with_firestore(FirestoreDb::new_mock()))
}

/// Create a test JWT token.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Authenticated GET request.
#[allow(dead_code)]
pub fn authed_get(uri: &str, state: &AppState) -> Request<Body> {
    let token = create_test_jwt("user-1", &state.config.jwt_signing_key);
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
