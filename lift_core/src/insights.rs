//! Rule-based training insights.
//!
//! Rules are evaluated in a fixed order over aggregate inputs; each matching
//! rule appends one tip:
//!
//! 1. Consistency (always one of opportunity/strong)
//! 2. Volume trend (recent average working volume above zero)
//! 3. Session hygiene (some session never ended)
//!
//! With no sessions at all, a single baseline tip is returned instead.

use crate::stats::total_session_volume;
use crate::weekly::{weekly_consistency, WeekDefinition, WeeklyConsistencySummary};
use crate::WorkoutSession;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of most recent sessions averaged for the volume trend
const RECENT_SESSION_WINDOW: usize = 4;

/// Which rule produced a tip
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Baseline,
    ConsistencyOpportunity,
    ConsistencyStrong,
    VolumeTrend,
    SessionHygiene,
}

/// A human-readable tip
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct InsightTip {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl InsightTip {
    fn new(kind: InsightKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Aggregates the rules are evaluated over
#[derive(Clone, Debug, PartialEq)]
pub struct InsightInputs {
    pub session_count: usize,
    pub consistency: WeeklyConsistencySummary,
    /// Mean working volume of the most recent sessions (chronological)
    pub recent_average_volume: f64,
    /// Sessions without an end time
    pub open_sessions: usize,
}

impl InsightInputs {
    /// Derive the aggregates from raw sessions and a weekly summary
    pub fn from_sessions(sessions: &[WorkoutSession], consistency: WeeklyConsistencySummary) -> Self {
        let mut chronological: Vec<&WorkoutSession> = sessions.iter().collect();
        chronological.sort_by_key(|s| s.started_at);

        let recent = &chronological[chronological.len().saturating_sub(RECENT_SESSION_WINDOW)..];
        let recent_average_volume = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|s| total_session_volume(s)).sum::<f64>() / recent.len() as f64
        };

        Self {
            session_count: sessions.len(),
            consistency,
            recent_average_volume,
            open_sessions: sessions.iter().filter(|s| s.is_active()).count(),
        }
    }
}

/// Evaluate the insight rules, in order
pub fn tips(inputs: &InsightInputs) -> Vec<InsightTip> {
    if inputs.session_count == 0 {
        return vec![InsightTip::new(
            InsightKind::Baseline,
            "Start Your Baseline",
            "Log your first workout to unlock consistency and coverage insights.".into(),
        )];
    }

    let mut items = Vec::new();
    let consistency = &inputs.consistency;

    if consistency.completed < consistency.target {
        items.push(InsightTip::new(
            InsightKind::ConsistencyOpportunity,
            "Consistency Opportunity",
            format!(
                "You are {}/{} sessions this week. Add one short session to stay on track.",
                consistency.completed, consistency.target
            ),
        ));
    } else {
        items.push(InsightTip::new(
            InsightKind::ConsistencyStrong,
            "Consistency Strong",
            "You already hit your weekly session target. Focus on quality reps and recovery today."
                .into(),
        ));
    }

    if inputs.recent_average_volume > 0.0 {
        items.push(InsightTip::new(
            InsightKind::VolumeTrend,
            "Volume Trend",
            format!(
                "Your recent average session volume is {}. Keep load increases gradual for stable progress.",
                inputs.recent_average_volume.round() as i64
            ),
        ));
    }

    if inputs.open_sessions > 0 {
        items.push(InsightTip::new(
            InsightKind::SessionHygiene,
            "Session Hygiene",
            "Some sessions are still active. End sessions after training for cleaner history and better weekly analytics."
                .into(),
        ));
    }

    tracing::debug!("Generated {} insight tips", items.len());
    items
}

/// Tips for raw sessions, computing the weekly summary as of `now`
pub fn tips_for_sessions(
    sessions: &[WorkoutSession],
    weekly_target: i32,
    now: DateTime<Utc>,
    week: &WeekDefinition,
) -> Vec<InsightTip> {
    let consistency = weekly_consistency(sessions, weekly_target, now, week);
    tips(&InsightInputs::from_sessions(sessions, consistency))
}
