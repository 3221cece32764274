//! Weekly goal and consistency tracking.
//!
//! Counts sessions started within the calendar week containing a reference
//! date and compares the count with a weekly target.

use crate::WorkoutSession;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Offset, Utc, Weekday};
use serde::Serialize;

/// How calendar weeks are laid out for the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekDefinition {
    /// First day of the week
    pub week_start: Weekday,
    /// User's local offset from UTC; week boundaries are local midnights
    pub offset: FixedOffset,
}

impl Default for WeekDefinition {
    fn default() -> Self {
        Self::iso()
    }
}

impl WeekDefinition {
    /// Monday-start weeks in UTC
    pub fn iso() -> Self {
        Self {
            week_start: Weekday::Mon,
            offset: Utc.fix(),
        }
    }

    /// Half-open `[start, end)` interval of the week containing `reference`
    pub fn week_containing(&self, reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_date = reference.with_timezone(&self.offset).date_naive();
        let days_into_week = (7 + local_date.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;

        let start_local =
            (local_date - Duration::days(i64::from(days_into_week))).and_time(NaiveTime::MIN);
        let start_utc = start_local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        let start = DateTime::<Utc>::from_naive_utc_and_offset(start_utc, Utc);

        (start, start + Duration::days(7))
    }
}

/// Progress toward the weekly session target
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct WeeklyConsistencySummary {
    pub completed: i32,
    pub target: i32,
}

impl WeeklyConsistencySummary {
    /// `min(1, completed / target)`, 0 when the target is not positive
    pub fn progress(&self) -> f64 {
        if self.target <= 0 {
            return 0.0;
        }
        (f64::from(self.completed) / f64::from(self.target)).min(1.0)
    }

    pub fn remaining(&self) -> i32 {
        remaining_sessions(self.target, self.completed)
    }

    pub fn target_met(&self) -> bool {
        self.completed >= self.target
    }
}

/// Number of sessions started within the week containing `reference`
///
/// Active (not yet ended) sessions count too.
pub fn completed_sessions_this_week(
    sessions: &[WorkoutSession],
    reference: DateTime<Utc>,
    week: &WeekDefinition,
) -> i32 {
    let (start, end) = week.week_containing(reference);
    let count = sessions
        .iter()
        .filter(|s| s.started_at >= start && s.started_at < end)
        .count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// `max(0, target - completed)`
pub fn remaining_sessions(target: i32, completed: i32) -> i32 {
    target.saturating_sub(completed).max(0)
}

/// Weekly summary for `sessions` against `target`
pub fn weekly_consistency(
    sessions: &[WorkoutSession],
    target: i32,
    reference: DateTime<Utc>,
    week: &WeekDefinition,
) -> WeeklyConsistencySummary {
    let completed = completed_sessions_this_week(sessions, reference, week);
    tracing::debug!("Weekly consistency: {}/{} sessions", completed, target);
    WeeklyConsistencySummary { completed, target }
}
