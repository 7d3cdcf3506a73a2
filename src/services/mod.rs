// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity_source;
pub mod calendar;
pub mod month_window;

pub use activity_source::{ActivityRecord, ActivitySource, ActivityTime, InMemorySource};
pub use calendar::{CalendarError, CalendarService};
pub use month_window::{FetchRange, MonthWindow};
