//! Progressive overload recommendations.
//!
//! Progression rules, given the latest working set for an exercise:
//! 1. Below the rep goal: keep the weight, add one rep (capped at the goal)
//! 2. At or above the rep goal: add load (larger jump for heavy categories)
//!    and restart at 6-8 reps
//!
//! Alongside the message, the best Epley estimate over recent history is
//! turned into a small table of working weights for fixed rep targets.

use crate::config::OverloadConfig;
use crate::stats::{estimated_one_rep_max, weight_for_reps};
use crate::{Exercise, LoggedSet, WorkoutSession};
use serde::Serialize;
use uuid::Uuid;

/// Next step recommended for the exercise
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverloadStep {
    /// Same weight, more reps
    AddReps { weight: f64, target_reps: i32 },
    /// Heavier weight, reps reset
    AddWeight { next_weight: f64 },
}

/// One row of the working-weight table
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct WorkingWeightRecommendation {
    pub reps: i32,
    pub weight: f64,
}

/// Recommendation for the next set of an exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressiveSuggestion {
    pub message: String,
    pub step: OverloadStep,
    pub estimated_one_rm: Option<f64>,
    pub recommendations: Vec<WorkingWeightRecommendation>,
}

/// Latest working set for an exercise and the working sets before it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkingSetHistory {
    pub latest: Option<LoggedSet>,
    /// Most recent first, bounded by the requested limit
    pub recent: Vec<LoggedSet>,
}

/// Round to the nearest multiple of 5 (halves away from zero)
pub fn round_to_nearest_five(value: f64) -> f64 {
    (value / 5.0).round() * 5.0
}

/// Load increment for the exercise's category
pub fn suggested_increment(exercise: Option<&Exercise>, config: &OverloadConfig) -> f64 {
    let Some(exercise) = exercise else {
        return config.base_increment;
    };

    let category = exercise.category.to_lowercase();
    let heavy = config
        .heavy_categories
        .iter()
        .any(|c| category.contains(&c.to_lowercase()));

    if heavy {
        config.heavy_increment
    } else {
        config.base_increment
    }
}

/// Best Epley estimate over valid working sets, `None` when there are none
///
/// Sets with non-positive reps or weight are skipped.
pub fn estimate_one_rep_max<'a>(sets: impl IntoIterator<Item = &'a LoggedSet>) -> Option<f64> {
    sets.into_iter()
        .filter(|s| s.is_working() && s.reps > 0 && s.weight > 0.0)
        .map(|s| estimated_one_rep_max(s.weight, s.reps))
        .reduce(f64::max)
}

/// Suggest the next working weight/reps for an exercise
///
/// Returns `None` when there is no prior working set.
pub fn suggest(
    exercise: Option<&Exercise>,
    latest: Option<&LoggedSet>,
    recent: &[LoggedSet],
    config: &OverloadConfig,
) -> Option<ProgressiveSuggestion> {
    let latest = latest?;
    let current_weight = latest.weight;
    let current_reps = latest.reps;

    let (step, message) = if current_reps < config.rep_goal {
        let target_reps = config.rep_goal.min(current_reps + 1);
        (
            OverloadStep::AddReps {
                weight: current_weight,
                target_reps,
            },
            format!(
                "Last set was {}x{}. Keep the same weight and aim for {} reps next set.",
                current_reps, current_weight, target_reps
            ),
        )
    } else {
        let next_weight =
            round_to_nearest_five(current_weight + suggested_increment(exercise, config));
        (
            OverloadStep::AddWeight { next_weight },
            format!(
                "You hit {} reps at {}. Increase to ~{} and work back up from 6-8 reps.",
                current_reps, current_weight, next_weight
            ),
        )
    };

    let estimated_one_rm = estimate_one_rep_max(recent.iter().chain(std::iter::once(latest)));
    let recommendations = match estimated_one_rm {
        Some(one_rm) => config
            .target_reps
            .iter()
            .map(|&reps| WorkingWeightRecommendation {
                reps,
                weight: round_to_nearest_five(weight_for_reps(one_rm, reps)),
            })
            .collect(),
        None => Vec::new(),
    };

    tracing::debug!(
        "Overload suggestion for {}: {:?}, e1RM {:?}",
        exercise.map(|e| e.name.as_str()).unwrap_or("unknown exercise"),
        step,
        estimated_one_rm
    );

    Some(ProgressiveSuggestion {
        message,
        step,
        estimated_one_rm,
        recommendations,
    })
}

/// Collect an exercise's working-set history across sessions
///
/// Sets are ordered by `created_at`; the newest becomes `latest` and up to
/// `limit` earlier sets fill `recent`.
pub fn working_set_history(
    sessions: &[WorkoutSession],
    exercise_id: Uuid,
    limit: usize,
) -> WorkingSetHistory {
    let mut sets: Vec<&LoggedSet> = sessions
        .iter()
        .flat_map(|s| s.logged_exercises.iter())
        .filter(|e| e.exercise_id == exercise_id)
        .flat_map(|e| e.working_sets())
        .collect();

    sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut sets = sets.into_iter().cloned();
    WorkingSetHistory {
        latest: sets.next(),
        recent: sets.take(limit).collect(),
    }
}

/// History lookup followed by [`suggest`]
pub fn suggest_for_exercise(
    sessions: &[WorkoutSession],
    exercise: &Exercise,
    config: &OverloadConfig,
) -> Option<ProgressiveSuggestion> {
    let history = working_set_history(sessions, exercise.id, config.history_limit);
    suggest(
        Some(exercise),
        history.latest.as_ref(),
        &history.recent,
        config,
    )
}
