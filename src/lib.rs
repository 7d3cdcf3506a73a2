// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wellness Tracker: backend API for a personal wellness app
//!
//! This crate serves the monthly activity calendar, which merges workouts,
//! stretch sessions and meditation sessions into one per-day view in the
//! client's timezone.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::CalendarService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub calendar_service: CalendarService,
}
