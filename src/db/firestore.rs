// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed read operations.
//!
//! Provides range queries over:
//! - Workouts (completed and planned) and their sets
//! - Stretch sessions
//! - Meditation sessions

use crate::db::collections;
use crate::error::AppError;
use crate::models::records::{
    MeditationSessionRecord, StretchSessionRecord, WorkoutRecord, WorkoutSetRecord,
};
use firestore::FirestoreQueryDirection;
use serde::Serialize;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    collection_prefix: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, collection_prefix: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so connect unauthenticated.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, collection_prefix).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(
            project = project_id,
            prefix = collection_prefix,
            "Connected to Firestore"
        );

        Ok(Self {
            client: Some(client),
            collection_prefix: collection_prefix.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        collection_prefix: &str,
    ) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            prefix = collection_prefix,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            collection_prefix: collection_prefix.to_string(),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            collection_prefix: String::new(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Deployed name of a collection.
    pub fn collection(&self, name: &str) -> String {
        format!("{}{}", self.collection_prefix, name)
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Workouts completed in `[start, end)` (RFC3339 bounds), oldest first.
    pub async fn get_completed_workouts(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<WorkoutRecord>, AppError> {
        let collection = self.collection(collections::WORKOUTS);
        let (user_id, start, end) = (user_id.to_string(), start.to_string(), end.to_string());

        self.get_client()?
            .fluent()
            .select()
            .from(collection.as_str())
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("completed_at").greater_than_or_equal(start.clone()),
                    q.field("completed_at").less_than(end.clone()),
                ])
            })
            .order_by([("completed_at", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Workouts scheduled between two local dates (inclusive, YYYY-MM-DD).
    ///
    /// Includes completed workouts; callers filter on `completed_at`.
    pub async fn get_scheduled_workouts(
        &self,
        user_id: &str,
        first_day: &str,
        last_day: &str,
    ) -> Result<Vec<WorkoutRecord>, AppError> {
        let collection = self.collection(collections::WORKOUTS);
        let (user_id, first_day, last_day) = (
            user_id.to_string(),
            first_day.to_string(),
            last_day.to_string(),
        );

        self.get_client()?
            .fluent()
            .select()
            .from(collection.as_str())
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("scheduled_date")
                        .greater_than_or_equal(first_day.clone()),
                    q.field("scheduled_date").less_than_or_equal(last_day.clone()),
                ])
            })
            .order_by([("scheduled_date", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All sets belonging to a workout.
    pub async fn get_sets_for_workout(
        &self,
        workout_id: &str,
    ) -> Result<Vec<WorkoutSetRecord>, AppError> {
        let collection = self.collection(collections::WORKOUT_SETS);
        let workout_id = workout_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collection.as_str())
            .filter(move |q| q.for_all([q.field("workout_id").eq(workout_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Stretch sessions completed in `[start, end)`, oldest first.
    pub async fn get_stretch_sessions(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<StretchSessionRecord>, AppError> {
        self.query_completed_between(collections::STRETCH_SESSIONS, user_id, start, end)
            .await
    }

    /// Meditation sessions completed in `[start, end)`, oldest first.
    pub async fn get_meditation_sessions(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<MeditationSessionRecord>, AppError> {
        self.query_completed_between(collections::MEDITATION_SESSIONS, user_id, start, end)
            .await
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to range-query a session collection on `completed_at`.
    async fn query_completed_between<T>(
        &self,
        name: &str,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let collection = self.collection(name);
        let (user_id, start, end) = (user_id.to_string(), start.to_string(), end.to_string());

        self.get_client()?
            .fluent()
            .select()
            .from(collection.as_str())
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("completed_at").greater_than_or_equal(start.clone()),
                    q.field("completed_at").less_than(end.clone()),
                ])
            })
            .order_by([("completed_at", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a document (used to seed the emulator).
    pub async fn upsert_document<T>(
        &self,
        name: &str,
        document_id: &str,
        document: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + for<'de> serde::Deserialize<'de> + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(self.collection(name).as_str())
            .document_id(document_id)
            .object(document)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
