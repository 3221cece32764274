//! Volume and strength arithmetic over logged sets.
//!
//! Warmup sets never contribute to any figure computed here.

use crate::{LoggedExercise, LoggedSet, WorkoutSession};

/// Divisor of the Epley formula
const EPLEY_DIVISOR: f64 = 30.0;

/// Sum of weight × reps over every working set in the session
pub fn total_session_volume(session: &WorkoutSession) -> f64 {
    session.working_sets().map(LoggedSet::volume).sum()
}

/// Sum of weight × reps over one logged exercise's working sets
pub fn exercise_volume(logged: &LoggedExercise) -> f64 {
    logged.working_sets().map(LoggedSet::volume).sum()
}

/// Estimated one-rep max (Epley): `weight * (1 + reps / 30)`
///
/// Returns 0 when `reps <= 0`.
pub fn estimated_one_rep_max(weight: f64, reps: i32) -> f64 {
    if reps <= 0 {
        return 0.0;
    }
    weight * (1.0 + f64::from(reps) / EPLEY_DIVISOR)
}

/// Weight that should allow exactly `reps` reps for a given 1RM (Epley inverse)
pub fn weight_for_reps(one_rep_max: f64, reps: i32) -> f64 {
    if reps <= 0 {
        return one_rep_max;
    }
    one_rep_max / (1.0 + f64::from(reps) / EPLEY_DIVISOR)
}

/// Highest e1RM among the session's working sets, 0 when there are none
pub fn peak_one_rep_max(session: &WorkoutSession) -> f64 {
    session
        .working_sets()
        .map(|s| estimated_one_rep_max(s.weight, s.reps))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn set(reps: i32, weight: f64, is_warmup: bool) -> LoggedSet {
        LoggedSet {
            id: Uuid::new_v4(),
            reps,
            weight,
            is_warmup,
            created_at: Utc::now(),
        }
    }

    fn logged(sets: Vec<LoggedSet>) -> LoggedExercise {
        LoggedExercise {
            id: Uuid::new_v4(),
            order_index: 0,
            exercise_id: Uuid::new_v4(),
            sets,
        }
    }

    fn session(exercises: Vec<LoggedExercise>) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            notes: String::new(),
            workout_type_id: None,
            logged_exercises: exercises,
        }
    }

    #[test]
    fn test_estimated_one_rep_max() {
        let one_rm = estimated_one_rep_max(100.0, 5);
        assert!((one_rm - 116.6666).abs() < 0.001);
    }

    #[test]
    fn test_one_rep_max_zero_reps() {
        assert_eq!(estimated_one_rep_max(100.0, 0), 0.0);
        assert_eq!(estimated_one_rep_max(100.0, -3), 0.0);
    }

    #[test]
    fn test_session_volume_skips_warmups() {
        let s = session(vec![
            logged(vec![set(10, 50.0, true), set(8, 100.0, false)]),
            logged(vec![set(12, 20.0, false)]),
        ]);
        assert_eq!(total_session_volume(&s), 800.0 + 240.0);
    }

    #[test]
    fn test_empty_session_volume_is_zero() {
        assert_eq!(total_session_volume(&session(vec![])), 0.0);
        let warmup_only = session(vec![logged(vec![set(5, 60.0, true)])]);
        assert_eq!(total_session_volume(&warmup_only), 0.0);
    }

    #[test]
    fn test_exercise_volume() {
        let e = logged(vec![set(5, 100.0, false), set(5, 100.0, false), set(10, 40.0, true)]);
        assert_eq!(exercise_volume(&e), 1000.0);
    }

    #[test]
    fn test_peak_one_rep_max() {
        let s = session(vec![logged(vec![
            set(1, 200.0, true),
            set(5, 100.0, false),
            set(10, 90.0, false),
        ])]);
        assert!((peak_one_rep_max(&s) - 120.0).abs() < 1e-9);
        assert_eq!(peak_one_rep_max(&session(vec![])), 0.0);
    }

    #[test]
    fn test_weight_for_reps_inverts_epley() {
        let one_rm = estimated_one_rep_max(135.0, 8);
        assert!((weight_for_reps(one_rm, 8) - 135.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn test_epley_matches_formula(weight in 0.0f64..1000.0, reps in 1i32..100) {
            let expected = weight * (1.0 + f64::from(reps) / 30.0);
            prop_assert!((estimated_one_rep_max(weight, reps) - expected).abs() < 1e-9);
            prop_assert_eq!(estimated_one_rep_max(weight, 0), 0.0);
        }
    }
}
