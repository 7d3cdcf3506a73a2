// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;
pub mod sources;

pub use firestore::FirestoreDb;
pub use sources::{FirestoreMeditationSource, FirestoreStretchSource, FirestoreWorkoutSource};

/// Collection names as constants.
///
/// The deployed name is prefixed with `Config::collection_prefix`.
pub mod collections {
    pub const WORKOUTS: &str = "workouts";
    pub const WORKOUT_SETS: &str = "workout_sets";
    pub const STRETCH_SESSIONS: &str = "stretch_sessions";
    pub const MEDITATION_SESSIONS: &str = "meditation_sessions";
}
