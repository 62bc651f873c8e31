//! Summaries over a user's workout history for the dashboard and archive.
//!
//! Inputs are expected in the order [`crate::workout_store::WorkoutStore::workouts_for_user`]
//! returns them: most recent first.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

use crate::workout_model::{DayType, Workout};

/// How many workouts the dashboard lists.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_workouts: usize,
    /// Workouts dated within the last seven days.
    pub this_week: usize,
    pub last_workout: Option<DateTime<Utc>>,
    pub recent: Vec<Workout>,
}

impl DashboardSummary {
    pub fn from_workouts(workouts: &[Workout], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);

        Self {
            total_workouts: workouts.len(),
            this_week: workouts.iter().filter(|workout| workout.date >= week_ago).count(),
            last_workout: workouts.first().map(|workout| workout.date),
            recent: workouts.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

/// Archive view: the (optionally filtered) history plus the month count,
/// which always covers every day type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub total_workouts: usize,
    pub this_month: usize,
    pub workouts: Vec<Workout>,
}

impl ArchiveSummary {
    pub fn from_workouts(workouts: &[Workout], day: Option<DayType>, now: DateTime<Utc>) -> Self {
        Self {
            total_workouts: workouts.len(),
            this_month: count_in_month(workouts, now),
            workouts: filter_by_day(workouts, day),
        }
    }
}

/// `None` keeps everything.
pub fn filter_by_day(workouts: &[Workout], day: Option<DayType>) -> Vec<Workout> {
    workouts
        .iter()
        .filter(|workout| day.map_or(true, |day| workout.day_type == day))
        .cloned()
        .collect()
}

/// Workouts in the same calendar month and year as `now`.
pub fn count_in_month(workouts: &[Workout], now: DateTime<Utc>) -> usize {
    workouts
        .iter()
        .filter(|workout| workout.date.year() == now.year() && workout.date.month() == now.month())
        .count()
}
