// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar API routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::calendar::CalendarDataResponse;
use crate::services::calendar::CalendarError;
use crate::services::month_window::{MAX_YEAR, MIN_YEAR};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

/// Calendar routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/calendar/{year}/{month}", get(get_calendar_month))
}

/// Get the activity calendar for one month.
async fn get_calendar_month(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((year, month)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CalendarDataResponse>> {
    let year = parse_year(&year)?;
    let month = parse_month(&month)?;
    let timezone_offset = parse_timezone_offset(timezone_param(&params)?)?;

    tracing::debug!(
        user_id = %user.user_id,
        year,
        month,
        timezone_offset,
        "Fetching calendar month"
    );

    let response = state
        .calendar_service
        .get_month_data(&user.user_id, year, month, timezone_offset)
        .await?;

    Ok(Json(response))
}

/// Year must be exactly four digits within 1000-9999.
fn parse_year(raw: &str) -> std::result::Result<i32, CalendarError> {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalendarError::InvalidYear);
    }
    raw.parse::<i32>()
        .ok()
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
        .ok_or(CalendarError::InvalidYear)
}

/// Month must be an integer within 1-12 ("1" and "01" both accepted).
fn parse_month(raw: &str) -> std::result::Result<u32, CalendarError> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalendarError::InvalidMonth);
    }
    raw.parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or(CalendarError::InvalidMonth)
}

/// The `tz` query value: client offset in minutes east of UTC.
/// A repeated `tz` is an invalid offset.
fn timezone_param(
    params: &[(String, String)],
) -> std::result::Result<Option<&str>, CalendarError> {
    let mut values = params.iter().filter(|(key, _)| key == "tz");
    let first = values.next().map(|(_, value)| value.as_str());
    if values.next().is_some() {
        return Err(CalendarError::InvalidTimezoneOffset);
    }
    Ok(first)
}

/// Offset is optional; when present it must be an integer in range.
fn parse_timezone_offset(raw: Option<&str>) -> std::result::Result<i32, CalendarError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let minutes = raw
        .parse::<i32>()
        .map_err(|_| CalendarError::InvalidTimezoneOffset)?;
    crate::services::month_window::timezone_offset(minutes)?;
    Ok(minutes)
}
