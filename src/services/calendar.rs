// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly activity calendar.
//!
//! Merges workouts, stretch sessions and meditation sessions into one
//! per-day view of a month in the client's timezone:
//! 1. Resolve the local month window
//! 2. Fetch all three sources concurrently over a widened UTC range
//! 3. Bucket each record to its local date and drop dates outside the month
//! 4. Group by date and summarize each day

use crate::models::calendar::{
    ActivityKind, CalendarActivity, CalendarDataResponse, CalendarDayData,
};
use crate::services::activity_source::{ActivityRecord, ActivitySource, ActivityTime};
use crate::services::month_window::{FetchRange, MonthWindow};
use crate::time_utils::{format_local_date, format_utc_rfc3339};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Calendar errors.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid year: must be a 4-digit year between 1000 and 9999")]
    InvalidYear,

    #[error("Invalid month: must be an integer between 1 and 12")]
    InvalidMonth,

    #[error("Invalid timezone offset: must be an integer between -720 and 840 minutes")]
    InvalidTimezoneOffset,

    #[error("{kind} source unavailable: {message}")]
    SourceUnavailable { kind: ActivityKind, message: String },
}

impl CalendarError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CalendarError::SourceUnavailable { .. })
    }
}

/// Builds month views from the three activity sources.
#[derive(Clone)]
pub struct CalendarService {
    workouts: Arc<dyn ActivitySource>,
    stretches: Arc<dyn ActivitySource>,
    meditations: Arc<dyn ActivitySource>,
}

impl CalendarService {
    pub fn new(
        workouts: Arc<dyn ActivitySource>,
        stretches: Arc<dyn ActivitySource>,
        meditations: Arc<dyn ActivitySource>,
    ) -> Self {
        Self {
            workouts,
            stretches,
            meditations,
        }
    }

    /// Build the calendar for one month.
    ///
    /// Fails as a whole if any source fails.
    pub async fn get_month_data(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        timezone_offset_minutes: i32,
    ) -> Result<CalendarDataResponse, CalendarError> {
        let window = MonthWindow::resolve(year, month, timezone_offset_minutes)?;
        let range = window.fetch_range();

        tracing::debug!(
            user_id,
            year,
            month,
            timezone_offset_minutes,
            range_start = %range.start,
            range_end = %range.end,
            "Fetching calendar activities"
        );

        let (workouts, stretches, meditations) = tokio::try_join!(
            fetch(self.workouts.as_ref(), user_id, range),
            fetch(self.stretches.as_ref(), user_id, range),
            fetch(self.meditations.as_ref(), user_id, range),
        )?;

        let fetched = workouts.len() + stretches.len() + meditations.len();
        let response = assemble_month(
            &window,
            workouts.into_iter().chain(stretches).chain(meditations),
        );

        tracing::debug!(
            user_id,
            year,
            month,
            fetched,
            days = response.days.len(),
            "Calendar assembled"
        );

        Ok(response)
    }
}

async fn fetch(
    source: &dyn ActivitySource,
    user_id: &str,
    range: FetchRange,
) -> Result<Vec<ActivityRecord>, CalendarError> {
    source.fetch_in_range(user_id, range).await.map_err(|e| {
        tracing::error!(
            source = %source.kind(),
            user_id,
            error = %e,
            "Activity source failed"
        );
        CalendarError::SourceUnavailable {
            kind: source.kind(),
            message: e.to_string(),
        }
    })
}

/// Bucket records into local days of `window` and summarize each day.
///
/// Records keep their input order within a day. Records landing outside the
/// month are dropped.
pub fn assemble_month(
    window: &MonthWindow,
    records: impl IntoIterator<Item = ActivityRecord>,
) -> CalendarDataResponse {
    let mut grouped: BTreeMap<NaiveDate, Vec<CalendarActivity>> = BTreeMap::new();

    for record in records {
        let date = match record.time {
            ActivityTime::Completed(at) => window.local_date_for(at),
            ActivityTime::Planned(date) => date,
        };
        if !window.contains(date) {
            continue;
        }

        let completed_at = record.completed_at().map(format_utc_rfc3339);
        grouped.entry(date).or_default().push(CalendarActivity {
            id: record.id,
            date: format_local_date(date),
            completed_at,
            details: record.details,
        });
    }

    let days = grouped
        .into_iter()
        .map(|(date, activities)| {
            let key = format_local_date(date);
            (key.clone(), CalendarDayData::new(key, activities))
        })
        .collect();

    CalendarDataResponse {
        start_date: format_local_date(window.start_date),
        end_date: format_local_date(window.end_date),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::{
        ActivityDetails, DaySummary, MeditationSummary, StretchSummary, WorkoutSummary,
    };
    use crate::models::records::WorkoutStatus;
    use crate::services::activity_source::InMemorySource;
    use crate::time_utils::{parse_local_date, parse_utc_rfc3339};

    fn workout_details(status: WorkoutStatus) -> ActivityDetails {
        ActivityDetails::Workout(WorkoutSummary {
            day_name: "Pull Day".to_string(),
            exercise_count: 4,
            sets_completed: 12,
            total_sets: 12,
            week_number: 1,
            is_deload: false,
            status,
        })
    }

    fn completed(id: &str, at: &str, details: ActivityDetails) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            time: ActivityTime::Completed(parse_utc_rfc3339(at).unwrap()),
            details,
        }
    }

    fn workout(id: &str, at: &str) -> ActivityRecord {
        completed(id, at, workout_details(WorkoutStatus::Completed))
    }

    fn stretch(id: &str, at: &str) -> ActivityRecord {
        completed(
            id,
            at,
            ActivityDetails::Stretch(StretchSummary {
                total_duration_seconds: 480,
                regions_completed: 4,
                regions_skipped: 0,
            }),
        )
    }

    fn meditation(id: &str, at: &str) -> ActivityRecord {
        completed(
            id,
            at,
            ActivityDetails::Meditation(MeditationSummary {
                duration_seconds: 600,
                meditation_type: "basic-breathing".to_string(),
            }),
        )
    }

    fn service(
        workouts: Vec<ActivityRecord>,
        stretches: Vec<ActivityRecord>,
        meditations: Vec<ActivityRecord>,
    ) -> CalendarService {
        CalendarService::new(
            Arc::new(InMemorySource::new(ActivityKind::Workout, workouts)),
            Arc::new(InMemorySource::new(ActivityKind::Stretch, stretches)),
            Arc::new(InMemorySource::new(ActivityKind::Meditation, meditations)),
        )
    }

    #[tokio::test]
    async fn test_single_completed_workout() {
        let calendar = service(vec![workout("w1", "2024-01-15T10:00:00Z")], vec![], vec![]);

        let response = calendar.get_month_data("user-1", 2024, 1, 0).await.unwrap();

        assert_eq!(response.start_date, "2024-01-01");
        assert_eq!(response.end_date, "2024-01-31");
        assert_eq!(response.days.len(), 1);

        let day = &response.days["2024-01-15"];
        assert_eq!(day.date, "2024-01-15");
        assert_eq!(day.activities.len(), 1);
        assert_eq!(
            day.activities[0].completed_at.as_deref(),
            Some("2024-01-15T10:00:00Z")
        );
        assert_eq!(
            day.summary,
            DaySummary {
                total_activities: 1,
                completed_activities: 1,
                has_workout: true,
                has_stretch: false,
                has_meditation: false,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_month_has_bounds_and_no_days() {
        let calendar = service(vec![], vec![], vec![]);

        let response = calendar.get_month_data("user-1", 2024, 12, 0).await.unwrap();

        assert_eq!(response.start_date, "2024-12-01");
        assert_eq!(response.end_date, "2024-12-31");
        assert!(response.days.is_empty());
    }

    #[tokio::test]
    async fn test_merges_all_kinds_on_one_day() {
        let calendar = service(
            vec![workout("w1", "2024-03-10T08:00:00Z")],
            vec![stretch("s1", "2024-03-10T09:00:00Z")],
            vec![meditation("m1", "2024-03-10T21:00:00Z")],
        );

        let response = calendar.get_month_data("user-1", 2024, 3, 0).await.unwrap();
        let day = &response.days["2024-03-10"];

        let kinds: Vec<ActivityKind> = day.activities.iter().map(|a| a.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Workout,
                ActivityKind::Stretch,
                ActivityKind::Meditation
            ]
        );
        assert_eq!(
            day.summary,
            DaySummary {
                total_activities: 3,
                completed_activities: 3,
                has_workout: true,
                has_stretch: true,
                has_meditation: true,
            }
        );
    }

    #[tokio::test]
    async fn test_days_without_activity_are_absent() {
        let calendar = service(
            vec![workout("w1", "2024-01-02T12:00:00Z")],
            vec![stretch("s1", "2024-01-20T12:00:00Z")],
            vec![],
        );

        let response = calendar.get_month_data("user-1", 2024, 1, 0).await.unwrap();

        let keys: Vec<&str> = response.days.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024-01-02", "2024-01-20"]);
        assert!(!response.days.contains_key("2024-01-03"));
    }

    #[tokio::test]
    async fn test_month_boundary_depends_on_offset() {
        let records = || vec![workout("w1", "2024-01-31T23:30:00Z")];

        let pacific = service(records(), vec![], vec![])
            .get_month_data("user-1", 2024, 1, -480)
            .await
            .unwrap();
        assert!(pacific.days.contains_key("2024-01-31"));

        let singapore = service(records(), vec![], vec![])
            .get_month_data("user-1", 2024, 1, 480)
            .await
            .unwrap();
        assert!(singapore.days.is_empty());

        let singapore_feb = service(records(), vec![], vec![])
            .get_month_data("user-1", 2024, 2, 480)
            .await
            .unwrap();
        assert!(singapore_feb.days.contains_key("2024-02-01"));
    }

    #[tokio::test]
    async fn test_previous_month_utc_record_can_land_in_month() {
        // 2024-02-29T20:00Z is 2024-03-01 04:00 at UTC+8
        let calendar = service(vec![], vec![], vec![meditation("m1", "2024-02-29T20:00:00Z")]);

        let response = calendar.get_month_data("user-1", 2024, 3, 480).await.unwrap();

        assert_eq!(response.days["2024-03-01"].activities[0].id, "m1");
        assert_eq!(
            response.days["2024-03-01"].activities[0].completed_at.as_deref(),
            Some("2024-02-29T20:00:00Z")
        );
    }

    #[tokio::test]
    async fn test_planned_workout_uses_scheduled_date() {
        let skipped = ActivityRecord {
            id: "w2".to_string(),
            time: ActivityTime::Planned(parse_local_date("2024-01-16").unwrap()),
            details: workout_details(WorkoutStatus::Skipped),
        };
        let calendar = service(vec![skipped], vec![], vec![]);

        // Offset does not move a planned date.
        let response = calendar.get_month_data("user-1", 2024, 1, 840).await.unwrap();
        let day = &response.days["2024-01-16"];

        assert!(day.activities[0].completed_at.is_none());
        assert_eq!(day.summary.completed_activities, 0);
        assert_eq!(day.summary.total_activities, 1);
        assert!(day.summary.has_workout);
    }

    #[tokio::test]
    async fn test_record_appears_under_exactly_one_date() {
        let calendar = service(
            vec![
                workout("w1", "2024-05-01T00:00:00Z"),
                workout("w2", "2024-05-31T23:59:59Z"),
            ],
            vec![],
            vec![],
        );

        let response = calendar.get_month_data("user-1", 2024, 5, -300).await.unwrap();

        let ids: Vec<&str> = response
            .days
            .values()
            .flat_map(|day| day.activities.iter().map(|a| a.id.as_str()))
            .collect();
        // w1 is April 30 locally; w2 stays on May 31.
        assert_eq!(ids, vec!["w2"]);
    }

    #[tokio::test]
    async fn test_identical_calls_produce_identical_output() {
        let calendar = service(
            vec![workout("w1", "2024-01-15T10:00:00Z")],
            vec![stretch("s1", "2024-01-15T11:00:00Z")],
            vec![meditation("m1", "2024-01-16T10:00:00Z")],
        );

        let first = calendar.get_month_data("user-1", 2024, 1, 60).await.unwrap();
        let second = calendar.get_month_data("user-1", 2024, 1, 60).await.unwrap();

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_source_failure_fails_whole_calendar() {
        let calendar = CalendarService::new(
            Arc::new(InMemorySource::new(
                ActivityKind::Workout,
                vec![workout("w1", "2024-01-15T10:00:00Z")],
            )),
            Arc::new(InMemorySource::failing(ActivityKind::Stretch, "unreachable")),
            Arc::new(InMemorySource::empty(ActivityKind::Meditation)),
        );

        let err = calendar
            .get_month_data("user-1", 2024, 1, 0)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CalendarError::SourceUnavailable {
                kind: ActivityKind::Stretch,
                ..
            }
        ));
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn test_validation_happens_before_fetching() {
        let workouts = Arc::new(InMemorySource::empty(ActivityKind::Workout));
        let calendar = CalendarService::new(
            workouts.clone(),
            Arc::new(InMemorySource::empty(ActivityKind::Stretch)),
            Arc::new(InMemorySource::empty(ActivityKind::Meditation)),
        );

        let err = calendar
            .get_month_data("user-1", 2024, 13, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidMonth));

        let err = calendar
            .get_month_data("user-1", 999, 1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidYear));

        let err = calendar
            .get_month_data("user-1", 2024, 1, 841)
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidTimezoneOffset));
        assert!(err.is_validation());

        assert_eq!(workouts.fetch_count(), 0);
    }

    #[test]
    fn test_assemble_keeps_input_order_within_day() {
        let window = MonthWindow::resolve(2024, 1, 0).unwrap();
        let response = assemble_month(
            &window,
            vec![
                stretch("s2", "2024-01-15T20:00:00Z"),
                stretch("s1", "2024-01-15T08:00:00Z"),
            ],
        );

        let ids: Vec<&str> = response.days["2024-01-15"]
            .activities
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s2", "s1"]);
    }
}
