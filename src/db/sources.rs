// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed activity sources for the calendar.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::calendar::{
    ActivityDetails, ActivityKind, MeditationSummary, StretchSummary, WorkoutSummary,
};
use crate::models::records::{
    MeditationSessionRecord, StretchSessionRecord, WorkoutRecord, WorkoutSetRecord, WorkoutStatus,
};
use crate::services::activity_source::{ActivityRecord, ActivitySource, ActivityTime};
use crate::services::calendar::CalendarService;
use crate::services::month_window::FetchRange;
use crate::time_utils::{format_local_date, format_utc_rfc3339, parse_local_date, parse_utc_rfc3339};
use async_trait::async_trait;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;

/// Mesocycles run six training weeks followed by one deload week.
const DELOAD_WEEK: u32 = 7;

const MAX_CONCURRENT_SET_QUERIES: usize = 10;

impl CalendarService {
    /// Calendar reading from Firestore.
    pub fn with_firestore(db: FirestoreDb) -> Self {
        Self::new(
            Arc::new(FirestoreWorkoutSource::new(db.clone())),
            Arc::new(FirestoreStretchSource::new(db.clone())),
            Arc::new(FirestoreMeditationSource::new(db)),
        )
    }
}

// ─── Workouts ────────────────────────────────────────────────

/// Completed workouts plus planned ones that were never completed.
pub struct FirestoreWorkoutSource {
    db: FirestoreDb,
}

impl FirestoreWorkoutSource {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivitySource for FirestoreWorkoutSource {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Workout
    }

    async fn fetch_in_range(&self, user_id: &str, range: FetchRange) -> Result<Vec<ActivityRecord>> {
        let start = format_utc_rfc3339(range.start);
        let end = format_utc_rfc3339(range.end);
        let first_day = format_local_date(range.start.date_naive());
        let last_day = format_local_date(range.end.date_naive());

        let (completed, scheduled) = tokio::try_join!(
            self.db.get_completed_workouts(user_id, &start, &end),
            self.db.get_scheduled_workouts(user_id, &first_day, &last_day),
        )?;

        let workouts = merge_workouts(completed, scheduled);

        // Keep workout order so the calendar output is stable.
        let ids: Vec<String> = workouts.iter().map(|w| w.id.clone()).collect();
        let sets: Vec<Vec<WorkoutSetRecord>> = stream::iter(ids)
            .map(|workout_id| {
                let db = self.db.clone();
                async move { db.get_sets_for_workout(&workout_id).await }
            })
            .buffered(MAX_CONCURRENT_SET_QUERIES)
            .try_collect()
            .await?;

        tracing::debug!(
            user_id,
            workouts = workouts.len(),
            "Fetched workouts for calendar"
        );

        Ok(workouts
            .iter()
            .zip(sets.iter())
            .filter_map(|(workout, sets)| workout_activity(workout, sets))
            .collect())
    }
}

/// Completed workouts first, then planned workouts without a completion time.
/// A workout matched by both queries is kept once.
fn merge_workouts(completed: Vec<WorkoutRecord>, scheduled: Vec<WorkoutRecord>) -> Vec<WorkoutRecord> {
    let mut seen = HashSet::new();
    completed
        .into_iter()
        .chain(scheduled.into_iter().filter(|w| w.completed_at.is_none()))
        .filter(|w| seen.insert(w.id.clone()))
        .collect()
}

fn workout_activity(workout: &WorkoutRecord, sets: &[WorkoutSetRecord]) -> Option<ActivityRecord> {
    let time = match workout.completed_at.as_deref() {
        Some(raw) => ActivityTime::Completed(parse_or_warn(raw, "workout", &workout.id)?),
        None => match parse_local_date(&workout.scheduled_date) {
            Some(date) => ActivityTime::Planned(date),
            None => {
                tracing::warn!(
                    workout_id = %workout.id,
                    scheduled_date = %workout.scheduled_date,
                    "Skipping workout with invalid scheduled date"
                );
                return None;
            }
        },
    };

    let exercises: HashSet<&str> = sets.iter().map(|s| s.exercise_id.as_str()).collect();
    let sets_completed = sets
        .iter()
        .filter(|s| s.status == WorkoutStatus::Completed)
        .count();

    Some(ActivityRecord {
        id: workout.id.clone(),
        time,
        details: ActivityDetails::Workout(WorkoutSummary {
            day_name: workout.plan_day_name.clone(),
            exercise_count: exercises.len() as u32,
            sets_completed: sets_completed as u32,
            total_sets: sets.len() as u32,
            week_number: workout.week_number,
            is_deload: workout.week_number == DELOAD_WEEK,
            status: workout.status,
        }),
    })
}

// ─── Stretch Sessions ────────────────────────────────────────

pub struct FirestoreStretchSource {
    db: FirestoreDb,
}

impl FirestoreStretchSource {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivitySource for FirestoreStretchSource {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Stretch
    }

    async fn fetch_in_range(&self, user_id: &str, range: FetchRange) -> Result<Vec<ActivityRecord>> {
        let sessions = self
            .db
            .get_stretch_sessions(
                user_id,
                &format_utc_rfc3339(range.start),
                &format_utc_rfc3339(range.end),
            )
            .await?;

        Ok(sessions.iter().filter_map(stretch_activity).collect())
    }
}

fn stretch_activity(session: &StretchSessionRecord) -> Option<ActivityRecord> {
    let completed_at = parse_or_warn(&session.completed_at, "stretch", &session.id)?;
    Some(ActivityRecord {
        id: session.id.clone(),
        time: ActivityTime::Completed(completed_at),
        details: ActivityDetails::Stretch(StretchSummary {
            total_duration_seconds: session.total_duration_seconds,
            regions_completed: session.regions_completed,
            regions_skipped: session.regions_skipped,
        }),
    })
}

// ─── Meditation Sessions ─────────────────────────────────────

pub struct FirestoreMeditationSource {
    db: FirestoreDb,
}

impl FirestoreMeditationSource {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivitySource for FirestoreMeditationSource {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Meditation
    }

    async fn fetch_in_range(&self, user_id: &str, range: FetchRange) -> Result<Vec<ActivityRecord>> {
        let sessions = self
            .db
            .get_meditation_sessions(
                user_id,
                &format_utc_rfc3339(range.start),
                &format_utc_rfc3339(range.end),
            )
            .await?;

        Ok(sessions.iter().filter_map(meditation_activity).collect())
    }
}

fn meditation_activity(session: &MeditationSessionRecord) -> Option<ActivityRecord> {
    let completed_at = parse_or_warn(&session.completed_at, "meditation", &session.id)?;
    Some(ActivityRecord {
        id: session.id.clone(),
        time: ActivityTime::Completed(completed_at),
        details: ActivityDetails::Meditation(MeditationSummary {
            duration_seconds: session.duration_seconds(),
            meditation_type: session.session_type.clone(),
        }),
    })
}

/// Parse a stored timestamp, logging and skipping records that are corrupt.
fn parse_or_warn(raw: &str, kind: &str, id: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let parsed = parse_utc_rfc3339(raw);
    if parsed.is_none() {
        tracing::warn!(
            kind,
            id,
            completed_at = raw,
            "Skipping record with invalid completion time"
        );
    }
    parsed
}
