//! Dashboard trends over session history.
//!
//! Day-level figures take the user's UTC offset so "today" matches the
//! calendar the user sees.

use crate::stats::{peak_one_rep_max, total_session_volume};
use crate::{Library, WorkoutSession};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Sessions considered for the week-over-week strength delta
const STRENGTH_DELTA_WINDOW: usize = 20;

/// Label for sessions whose split cannot be resolved
const UNKNOWN_SPLIT: &str = "Unknown";

/// How many recent sessions used a split
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SplitCount {
    pub name: String,
    pub count: usize,
}

/// Peak e1RM of one session
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub started_at: DateTime<Utc>,
    pub value: f64,
}

fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Working volume of every session started on `day`
pub fn volume_on_day(sessions: &[WorkoutSession], day: NaiveDate, offset: FixedOffset) -> f64 {
    sessions
        .iter()
        .filter(|s| local_date(s.started_at, offset) == day)
        .map(total_session_volume)
        .sum()
}

/// Split usage among the `limit` most recent sessions
///
/// Sorted by count (descending), then name.
pub fn split_distribution(
    sessions: &[WorkoutSession],
    library: &Library,
    limit: usize,
) -> Vec<SplitCount> {
    let mut recent: Vec<&WorkoutSession> = sessions.iter().collect();
    recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    let mut counts: HashMap<String, usize> = HashMap::new();
    for session in recent.into_iter().take(limit) {
        let name = session
            .workout_type_id
            .and_then(|id| library.split(id))
            .map(|split| split.name.clone())
            .unwrap_or_else(|| UNKNOWN_SPLIT.to_string());
        *counts.entry(name).or_default() += 1;
    }

    let mut distribution: Vec<SplitCount> = counts
        .into_iter()
        .map(|(name, count)| SplitCount { name, count })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    distribution
}

/// Peak e1RM per session for the `limit` most recent sessions, oldest first
pub fn strength_trend(sessions: &[WorkoutSession], limit: usize) -> Vec<TrendPoint> {
    let mut chronological: Vec<&WorkoutSession> = sessions.iter().collect();
    chronological.sort_by_key(|s| s.started_at);

    let skip = chronological.len().saturating_sub(limit);
    chronological
        .into_iter()
        .skip(skip)
        .map(|s| TrendPoint {
            started_at: s.started_at,
            value: peak_one_rep_max(s),
        })
        .collect()
}

/// Percent change of the latest peak e1RM in the past week against a baseline
///
/// The baseline is the oldest point before the week, or the second-to-last
/// point when every point falls inside the week. Returns 0 when there are
/// fewer than two points, no point in the past week, or the baseline is not
/// positive.
pub fn strength_delta_percent(sessions: &[WorkoutSession], now: DateTime<Utc>) -> f64 {
    let points = strength_trend(sessions, STRENGTH_DELTA_WINDOW);
    if points.len() < 2 {
        return 0.0;
    }

    let week_ago = now - Duration::days(7);
    let Some(latest) = points.iter().rev().find(|p| p.started_at >= week_ago) else {
        return 0.0;
    };

    let baseline = points
        .iter()
        .find(|p| p.started_at < week_ago)
        .or_else(|| points.iter().rev().nth(1))
        .map(|p| p.value)
        .unwrap_or(latest.value);

    if baseline <= 0.0 {
        return 0.0;
    }
    (latest.value - baseline) / baseline * 100.0
}

/// Whether any session started on each of the last seven days, oldest first
pub fn consistency_last_7_days(
    sessions: &[WorkoutSession],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> [bool; 7] {
    let today = local_date(now, offset);
    let mut days = [false; 7];
    for (slot, days_back) in (0..7i64).rev().enumerate() {
        let day = today - Duration::days(days_back);
        days[slot] = sessions
            .iter()
            .any(|s| local_date(s.started_at, offset) == day);
    }
    days
}
