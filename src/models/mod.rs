// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod calendar;
pub mod records;

pub use calendar::{
    ActivityDetails, ActivityKind, CalendarActivity, CalendarDataResponse, CalendarDayData,
    DaySummary,
};
pub use records::{
    MeditationSessionRecord, StretchSessionRecord, WorkoutRecord, WorkoutSetRecord, WorkoutStatus,
};
