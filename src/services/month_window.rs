// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Month window resolution and local-day bucketing.
//!
//! Timezone offsets are minutes east of UTC (`local = utc + offset`), the
//! same convention as `chrono::FixedOffset::east_opt`. US Pacific standard
//! time is therefore `-480`.

use crate::services::calendar::CalendarError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;
/// UTC-12:00
pub const MIN_TIMEZONE_OFFSET_MINUTES: i32 = -720;
/// UTC+14:00
pub const MAX_TIMEZONE_OFFSET_MINUTES: i32 = 840;

/// Extra margin on each side of the fetch range. Must be at least the largest
/// possible offset magnitude.
const FETCH_MARGIN_HOURS: i64 = 24;

/// Half-open UTC range `[start, end)` handed to activity sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Inclusive local-date bounds of one calendar month in a client timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offset: FixedOffset,
}

impl MonthWindow {
    /// Resolve the window for `year`/`month` as seen from a client at
    /// `timezone_offset_minutes`.
    pub fn resolve(
        year: i32,
        month: u32,
        timezone_offset_minutes: i32,
    ) -> Result<Self, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::InvalidYear);
        }
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth);
        }
        let offset = timezone_offset(timezone_offset_minutes)?;

        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth)?;
        let end_date = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .ok_or(CalendarError::InvalidMonth)?;

        Ok(Self {
            start_date,
            end_date,
            offset,
        })
    }

    /// Whether a local date falls inside the month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Local date an instant belongs to in this window's timezone.
    pub fn local_date_for(&self, instant: DateTime<Utc>) -> NaiveDate {
        local_date_for(instant, self.offset)
    }

    /// UTC range wide enough to contain every instant that buckets into
    /// this month.
    pub fn fetch_range(&self) -> FetchRange {
        let margin = Duration::hours(FETCH_MARGIN_HOURS);
        let local_start = self.start_date.and_time(NaiveTime::MIN);
        let local_end = self.end_date.and_time(NaiveTime::MIN) + Duration::days(1);

        FetchRange {
            start: self.local_to_utc(local_start) - margin,
            end: self.local_to_utc(local_end) + margin,
        }
    }

    fn local_to_utc(&self, local: chrono::NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&local) - Duration::seconds(i64::from(self.offset.local_minus_utc()))
    }
}

/// Validate an offset in minutes and convert it to a `FixedOffset`.
pub fn timezone_offset(minutes: i32) -> Result<FixedOffset, CalendarError> {
    if !(MIN_TIMEZONE_OFFSET_MINUTES..=MAX_TIMEZONE_OFFSET_MINUTES).contains(&minutes) {
        return Err(CalendarError::InvalidTimezoneOffset);
    }
    FixedOffset::east_opt(minutes * 60).ok_or(CalendarError::InvalidTimezoneOffset)
}

/// Local calendar date of `instant` at a fixed offset.
pub fn local_date_for(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month (1-12) of the Gregorian calendar.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
