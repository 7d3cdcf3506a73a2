// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity documents as stored in Firestore.
//!
//! These are written by the per-resource CRUD handlers; the calendar only
//! ever reads them.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle state of a workout or one of its sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WorkoutStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// Stored workout record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Document ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Mesocycle this workout belongs to
    #[serde(default)]
    pub mesocycle_id: Option<String>,
    /// Name of the plan day (e.g. "Push Day")
    #[serde(default)]
    pub plan_day_name: String,
    /// Planned local date (YYYY-MM-DD)
    #[serde(default)]
    pub scheduled_date: String,
    /// Current status
    #[serde(default)]
    pub status: WorkoutStatus,
    /// Week within the mesocycle (1-based)
    #[serde(default)]
    pub week_number: u32,
    /// Completion time (RFC3339), absent until the workout is finished
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Stored set within a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSetRecord {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    #[serde(default)]
    pub status: WorkoutStatus,
}

/// Stored stretch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StretchSessionRecord {
    pub id: String,
    pub user_id: String,
    /// Completion time (RFC3339)
    #[serde(default)]
    pub completed_at: String,
    #[serde(default)]
    pub total_duration_seconds: u32,
    #[serde(default)]
    pub regions_completed: u32,
    #[serde(default)]
    pub regions_skipped: u32,
}

/// Stored meditation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationSessionRecord {
    pub id: String,
    pub user_id: String,
    /// Completion time (RFC3339)
    #[serde(default)]
    pub completed_at: String,
    /// Meditation type identifier (e.g. "basic-breathing")
    #[serde(default)]
    pub session_type: String,
    #[serde(default)]
    pub planned_duration_seconds: u32,
    /// Seconds actually meditated; missing for sessions logged before tracking
    #[serde(default)]
    pub actual_duration_seconds: Option<u32>,
}

impl MeditationSessionRecord {
    /// Duration to report: the actual time if tracked, else the planned time.
    pub fn duration_seconds(&self) -> u32 {
        self.actual_duration_seconds
            .unwrap_or(self.planned_duration_seconds)
    }
}
