// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only activity sources consumed by the calendar.

use crate::error::{AppError, Result};
use crate::models::calendar::{ActivityDetails, ActivityKind};
use crate::services::month_window::FetchRange;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

/// When an activity happened, as far as the calendar is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTime {
    /// Completed at this instant; bucketed by the client's offset.
    Completed(DateTime<Utc>),
    /// Not completed; shown on the local date it was planned for.
    Planned(NaiveDate),
}

/// One activity as returned by a source, before bucketing.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    pub time: ActivityTime,
    pub details: ActivityDetails,
}

impl ActivityRecord {
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.time {
            ActivityTime::Completed(at) => Some(at),
            ActivityTime::Planned(_) => None,
        }
    }
}

/// A store of one kind of activity.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Kind of activity this source returns.
    fn kind(&self) -> ActivityKind;

    /// Fetch every record of `user_id` whose effective time falls in `range`.
    ///
    /// No ordering is guaranteed. An unreachable store is an error, never an
    /// empty result.
    async fn fetch_in_range(
        &self,
        user_id: &str,
        range: FetchRange,
    ) -> Result<Vec<ActivityRecord>>;
}

/// Source backed by a fixed list of records.
///
/// Filters by range the way a store query would. Used in tests and benches.
pub struct InMemorySource {
    kind: ActivityKind,
    records: Vec<ActivityRecord>,
    failure: Option<String>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new(kind: ActivityKind, records: Vec<ActivityRecord>) -> Self {
        Self {
            kind,
            records,
            failure: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn empty(kind: ActivityKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// A source whose store is unreachable.
    pub fn failing(kind: ActivityKind, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::empty(kind)
        }
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivitySource for InMemorySource {
    fn kind(&self) -> ActivityKind {
        self.kind
    }

    async fn fetch_in_range(
        &self,
        _user_id: &str,
        range: FetchRange,
    ) -> Result<Vec<ActivityRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(AppError::Database(message.clone()));
        }

        let first_day = range.start.date_naive();
        let last_day = range.end.date_naive();

        Ok(self
            .records
            .iter()
            .filter(|record| match record.time {
                ActivityTime::Completed(at) => range.contains(at),
                ActivityTime::Planned(date) => first_day <= date && date <= last_day,
            })
            .cloned()
            .collect())
    }
}
