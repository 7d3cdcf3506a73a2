// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Calendar response model: per-day activity lists and summaries.

use crate::models::records::WorkoutStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The three kinds of activity shown on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityKind {
    Workout,
    Stretch,
    Meditation,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Workout => "workout",
            ActivityKind::Stretch => "stretch",
            ActivityKind::Meditation => "meditation",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workout details shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutSummary {
    pub day_name: String,
    /// Distinct exercises in the workout
    pub exercise_count: u32,
    pub sets_completed: u32,
    pub total_sets: u32,
    pub week_number: u32,
    pub is_deload: bool,
    pub status: WorkoutStatus,
}

/// Stretch session details shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StretchSummary {
    pub total_duration_seconds: u32,
    pub regions_completed: u32,
    pub regions_skipped: u32,
}

/// Meditation session details shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeditationSummary {
    pub duration_seconds: u32,
    pub meditation_type: String,
}

/// Type-specific payload of a calendar activity.
///
/// Serialized as `"type": "<kind>", "summary": {...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "summary", rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityDetails {
    Workout(WorkoutSummary),
    Stretch(StretchSummary),
    Meditation(MeditationSummary),
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Workout(_) => ActivityKind::Workout,
            ActivityDetails::Stretch(_) => ActivityKind::Stretch,
            ActivityDetails::Meditation(_) => ActivityKind::Meditation,
        }
    }
}

/// One activity placed on a local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarActivity {
    /// Source record ID (unique within its own collection only)
    pub id: String,
    /// Local date (YYYY-MM-DD) the activity was bucketed into
    pub date: String,
    /// Completion time (RFC3339, UTC); null for planned or skipped activities
    pub completed_at: Option<String>,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl CalendarActivity {
    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Derived flags for one local day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DaySummary {
    pub total_activities: u32,
    pub completed_activities: u32,
    pub has_workout: bool,
    pub has_stretch: bool,
    pub has_meditation: bool,
}

impl DaySummary {
    /// Summarize the activities bucketed into one day.
    ///
    /// The `has_*` flags track presence, not completion.
    pub fn from_activities(activities: &[CalendarActivity]) -> Self {
        activities
            .iter()
            .fold(Self::default(), |mut summary, activity| {
                summary.total_activities += 1;
                if activity.is_completed() {
                    summary.completed_activities += 1;
                }
                match activity.kind() {
                    ActivityKind::Workout => summary.has_workout = true,
                    ActivityKind::Stretch => summary.has_stretch = true,
                    ActivityKind::Meditation => summary.has_meditation = true,
                }
                summary
            })
    }
}

/// All activities on one local day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarDayData {
    pub date: String,
    pub activities: Vec<CalendarActivity>,
    pub summary: DaySummary,
}

impl CalendarDayData {
    pub fn new(date: String, activities: Vec<CalendarActivity>) -> Self {
        let summary = DaySummary::from_activities(&activities);
        Self {
            date,
            activities,
            summary,
        }
    }
}

/// Calendar view of one month.
///
/// `days` only holds dates with at least one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarDataResponse {
    pub start_date: String,
    pub end_date: String,
    pub days: BTreeMap<String, CalendarDayData>,
}
