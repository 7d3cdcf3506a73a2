// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Calendar date format used for local dates (`YYYY-MM-DD`).
pub const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC3339 timestamp (any offset) into UTC.
pub fn parse_utc_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format(LOCAL_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, LOCAL_DATE_FORMAT).ok()
}
