//! Muscle coverage engine.
//!
//! Scores how thoroughly a session's working sets have trained each muscle
//! region targeted by the session's split:
//!
//! - Each logged exercise contributes `working sets × role weight` to every
//!   split region it maps to (primary 1.0, secondary 0.5 by default)
//! - Region progress is `min(1, score / target_score_per_region)`
//! - Group progress is the mean of its regions' progress
//!
//! The report is rebuilt from scratch on every call; nothing is cached.

use crate::config::CoverageConfig;
use crate::keywords::keyword_regions;
use crate::{Exercise, Library, MuscleGroup, MuscleRole, WorkoutSession, WorkoutType};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

/// Coverage of one muscle region
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RegionCoverage {
    pub id: Uuid,
    pub name: String,
    /// At least one working set landed on this region
    pub touched: bool,
    /// Progress reached the covered threshold
    pub covered: bool,
    pub working_set_count: u32,
    pub score: f64,
    pub progress: f64,
    /// Sorted, deduplicated exercise names
    pub contributing_exercises: Vec<String>,
}

/// Coverage of one muscle group
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GroupCoverage {
    pub id: Uuid,
    pub name: String,
    /// Regions whose progress reached the covered threshold
    pub touched_regions: usize,
    pub total_regions: usize,
    pub progress: f64,
    pub regions: Vec<RegionCoverage>,
}

/// Coverage of every group targeted by a split
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoverageReport {
    pub split_name: String,
    pub groups: Vec<GroupCoverage>,
}

impl CoverageReport {
    /// Mean progress over all groups, 0 for an empty report
    pub fn overall_progress(&self) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        self.groups.iter().map(|g| g.progress).sum::<f64>() / self.groups.len() as f64
    }
}

/// Strategy deciding which split regions an exercise trains
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionMatcher {
    /// Curated muscle maps only
    Curated,
    /// Curated maps; exercises with none inside the split fall back to
    /// name keywords, counted as primary
    CuratedWithKeywords,
}

impl RegionMatcher {
    pub fn from_config(config: &CoverageConfig) -> Self {
        if config.keyword_fallback {
            RegionMatcher::CuratedWithKeywords
        } else {
            RegionMatcher::Curated
        }
    }

    /// Split regions trained by `exercise`, with the role they are trained in
    pub fn regions_for(
        &self,
        exercise: &Exercise,
        split_groups: &[&MuscleGroup],
        split_regions: &HashSet<Uuid>,
    ) -> Vec<(Uuid, MuscleRole)> {
        let curated: Vec<_> = exercise
            .muscle_maps
            .iter()
            .filter(|m| split_regions.contains(&m.region_id))
            .map(|m| (m.region_id, m.role))
            .collect();

        match self {
            RegionMatcher::CuratedWithKeywords if curated.is_empty() => {
                keyword_regions(&exercise.name, split_groups)
                    .into_iter()
                    .map(|id| (id, MuscleRole::Primary))
                    .collect()
            }
            _ => curated,
        }
    }
}

#[derive(Default)]
struct RegionTally {
    score: f64,
    working_sets: u32,
    exercises: BTreeSet<String>,
}

/// Build the coverage report for `session` against `split`
pub fn build_report(
    session: &WorkoutSession,
    split: &WorkoutType,
    library: &Library,
    config: &CoverageConfig,
) -> CoverageReport {
    let matcher = RegionMatcher::from_config(config);
    let split_groups = library.split_groups(split);
    let split_regions = library.split_region_ids(split);

    let mut tallies: HashMap<Uuid, RegionTally> = HashMap::new();

    for logged in &session.logged_exercises {
        let working_sets = logged.working_set_count();
        if working_sets == 0 {
            continue;
        }

        let Some(exercise) = library.exercise(logged.exercise_id) else {
            tracing::debug!(
                "Logged exercise {} references unknown exercise {}",
                logged.id,
                logged.exercise_id
            );
            continue;
        };

        for (region_id, role) in matcher.regions_for(exercise, &split_groups, &split_regions) {
            let tally = tallies.entry(region_id).or_default();
            tally.score += f64::from(working_sets) * config.weight_for(role);
            tally.working_sets += working_sets;
            tally.exercises.insert(exercise.name.clone());
        }
    }

    let groups = split_groups
        .iter()
        .map(|group| group_coverage(group, &tallies, config))
        .collect();

    let report = CoverageReport {
        split_name: split.name.clone(),
        groups,
    };

    tracing::debug!(
        "Coverage for session {} ({}): {:.0}% overall",
        session.id,
        report.split_name,
        report.overall_progress() * 100.0
    );

    report
}

fn group_coverage(
    group: &MuscleGroup,
    tallies: &HashMap<Uuid, RegionTally>,
    config: &CoverageConfig,
) -> GroupCoverage {
    let regions: Vec<RegionCoverage> = group
        .regions
        .iter()
        .map(|region| {
            let (score, working_set_count, contributing_exercises) = match tallies.get(&region.id) {
                Some(t) => (t.score, t.working_sets, t.exercises.iter().cloned().collect()),
                None => (0.0, 0, Vec::new()),
            };
            let progress = region_progress(score, config.target_score_per_region);

            RegionCoverage {
                id: region.id,
                name: region.name.clone(),
                touched: score > 0.0,
                covered: progress >= config.covered_threshold,
                working_set_count,
                score,
                progress,
                contributing_exercises,
            }
        })
        .collect();

    let touched_regions = regions.iter().filter(|r| r.covered).count();
    let progress = if regions.is_empty() {
        0.0
    } else {
        regions.iter().map(|r| r.progress).sum::<f64>() / regions.len() as f64
    };

    GroupCoverage {
        id: group.id,
        name: group.name.clone(),
        touched_regions,
        total_regions: regions.len(),
        progress,
        regions,
    }
}

/// `score / target`, clamped to `[0, 1]`
pub fn region_progress(score: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (score / target).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_library, LoggedExercise, LoggedSet};
    use chrono::Utc;
    use proptest::prelude::*;

    fn set(is_warmup: bool) -> LoggedSet {
        LoggedSet {
            id: Uuid::new_v4(),
            reps: 10,
            weight: 50.0,
            is_warmup,
            created_at: Utc::now(),
        }
    }

    fn logged(library: &Library, name: &str, working: usize, warmup: usize) -> LoggedExercise {
        let exercise = library.exercise_by_name(name).unwrap();
        let mut sets: Vec<_> = (0..warmup).map(|_| set(true)).collect();
        sets.extend((0..working).map(|_| set(false)));
        LoggedExercise {
            id: Uuid::new_v4(),
            order_index: 0,
            exercise_id: exercise.id,
            sets,
        }
    }

    fn session(split: &WorkoutType, exercises: Vec<LoggedExercise>) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            notes: String::new(),
            workout_type_id: Some(split.id),
            logged_exercises: exercises,
        }
    }

    fn region<'a>(report: &'a CoverageReport, group: &str, name: &str) -> &'a RegionCoverage {
        report
            .groups
            .iter()
            .find(|g| g.name == group)
            .and_then(|g| g.regions.iter().find(|r| r.name == name))
            .unwrap()
    }

    #[test]
    fn test_warmup_only_sets_touch_nothing() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(push, vec![logged(&library, "Barbell Bench Press", 0, 3)]);

        let report = build_report(&s, push, &library, &CoverageConfig::default());

        assert_eq!(report.split_name, "Push");
        for group in &report.groups {
            assert_eq!(group.touched_regions, 0);
            assert!(group.regions.iter().all(|r| r.progress == 0.0 && !r.touched));
        }
    }

    #[test]
    fn test_primary_and_secondary_weights() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(push, vec![logged(&library, "Barbell Bench Press", 2, 1)]);

        let report = build_report(&s, push, &library, &CoverageConfig::default());

        let mid = region(&report, "Chest", "Mid");
        assert_eq!(mid.working_set_count, 2);
        assert_eq!(mid.score, 2.0);
        assert_eq!(mid.progress, 0.5);
        assert!(mid.touched);
        assert!(!mid.covered);
        assert_eq!(mid.contributing_exercises, vec!["Barbell Bench Press"]);

        let anterior = region(&report, "Shoulders", "Anterior");
        assert_eq!(anterior.score, 1.0);
        assert_eq!(anterior.progress, 0.25);

        let upper = region(&report, "Chest", "Upper");
        assert!(!upper.touched);
        assert!(upper.contributing_exercises.is_empty());
    }

    #[test]
    fn test_four_primary_sets_fill_region() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(push, vec![logged(&library, "Incline Dumbbell Press", 4, 0)]);

        let report = build_report(&s, push, &library, &CoverageConfig::default());
        let chest = report.groups.iter().find(|g| g.name == "Chest").unwrap();

        assert_eq!(chest.total_regions, 3);
        assert_eq!(chest.touched_regions, 1);
        assert!((chest.progress - 1.0 / 3.0).abs() < 1e-9);
        assert!(region(&report, "Chest", "Upper").covered);
    }

    #[test]
    fn test_three_sets_reach_covered_threshold() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(push, vec![logged(&library, "Cable Fly", 3, 0)]);

        let report = build_report(&s, push, &library, &CoverageConfig::default());
        let mid = region(&report, "Chest", "Mid");
        assert_eq!(mid.progress, 0.75);
        assert!(mid.covered);
    }

    #[test]
    fn test_contributors_deduplicated_and_sorted() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(
            push,
            vec![
                logged(&library, "Push-Up", 1, 0),
                logged(&library, "Barbell Bench Press", 1, 0),
                logged(&library, "Push-Up", 1, 0),
            ],
        );

        let report = build_report(&s, push, &library, &CoverageConfig::default());
        let mid = region(&report, "Chest", "Mid");
        assert_eq!(mid.working_set_count, 3);
        assert_eq!(
            mid.contributing_exercises,
            vec!["Barbell Bench Press", "Push-Up"]
        );
    }

    #[test]
    fn test_regions_outside_split_ignored() {
        let library = build_default_library();
        let pull = library.split_by_name("Pull").unwrap();
        let s = session(pull, vec![logged(&library, "Deadlift", 4, 0)]);

        let report = build_report(&s, pull, &library, &CoverageConfig::default());

        assert!(report.groups.iter().all(|g| g.name != "Legs"));
        assert_eq!(region(&report, "Back", "Lower Back").progress, 1.0);
    }

    #[test]
    fn test_unmapped_exercise_contributes_nothing() {
        let mut library = build_default_library();
        library.add_exercise(&crate::library::ExerciseSeed {
            name: "Sled Push".into(),
            category: "Conditioning".into(),
            equipment: "Sled".into(),
            primary: vec![],
            secondary: vec![],
        });
        let lower = library.split_by_name("Lower").unwrap().clone();
        let s = session(&lower, vec![logged(&library, "Sled Push", 5, 0)]);

        let report = build_report(&s, &lower, &library, &CoverageConfig::default());
        assert_eq!(report.overall_progress(), 0.0);
    }

    #[test]
    fn test_keyword_fallback_is_opt_in() {
        let mut library = build_default_library();
        library.add_exercise(&crate::library::ExerciseSeed {
            name: "Goblet Squat".into(),
            category: "Conditioning".into(),
            equipment: "Kettlebell".into(),
            primary: vec![],
            secondary: vec![],
        });
        let lower = library.split_by_name("Lower").unwrap().clone();
        let s = session(&lower, vec![logged(&library, "Goblet Squat", 2, 0)]);

        let curated = build_report(&s, &lower, &library, &CoverageConfig::default());
        assert!(!region(&curated, "Legs", "Quads").touched);

        let config = CoverageConfig {
            keyword_fallback: true,
            ..CoverageConfig::default()
        };
        let fallback = build_report(&s, &lower, &library, &config);
        assert_eq!(region(&fallback, "Legs", "Quads").score, 2.0);
        assert_eq!(region(&fallback, "Legs", "Glutes").score, 2.0);
        assert!(!region(&fallback, "Legs", "Calves").touched);
    }

    #[test]
    fn test_keyword_fallback_skipped_when_curated_maps_exist() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        // "Incline" keyword would hit Chest/Upper; curated map says Biceps/Long only
        let curl = library.exercise_by_name("Incline Dumbbell Curl").unwrap();
        let matcher = RegionMatcher::CuratedWithKeywords;
        let groups = library.split_groups(push);
        let regions = library.split_region_ids(push);

        // Biceps is outside Push, so the curated set is empty and keywords apply
        let hits = matcher.regions_for(curl, &groups, &regions);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, library.resolve_region("Chest/Upper").unwrap());

        let pull = library.split_by_name("Pull").unwrap();
        let hits = matcher.regions_for(curl, &library.split_groups(pull), &library.split_region_ids(pull));
        assert_eq!(
            hits,
            vec![(library.resolve_region("Biceps/Long").unwrap(), MuscleRole::Primary)]
        );
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let s = session(
            push,
            vec![
                logged(&library, "Dip", 3, 1),
                logged(&library, "Lateral Raise", 2, 0),
            ],
        );
        let config = CoverageConfig::default();

        assert_eq!(
            build_report(&s, push, &library, &config),
            build_report(&s, push, &library, &config)
        );
    }

    #[test]
    fn test_empty_group_progress_is_zero() {
        let mut library = build_default_library();
        library.add_group("Forearms", &[]);
        let split_id = library.add_split("Grip", &["Forearms"]);
        let split = library.split(split_id).unwrap();

        let report = build_report(&session(split, vec![]), split, &library, &CoverageConfig::default());
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].total_regions, 0);
        assert_eq!(report.groups[0].progress, 0.0);
    }

    proptest! {
        #[test]
        fn test_progress_clamped(score in 0.0f64..10_000.0) {
            let progress = region_progress(score, 4.0);
            prop_assert!((0.0..=1.0).contains(&progress));
        }

        #[test]
        fn test_progress_monotonic_in_working_sets(sets in 0usize..20) {
            let library = build_default_library();
            let push = library.split_by_name("Push").unwrap();
            let config = CoverageConfig::default();

            let before = session(push, vec![logged(&library, "Cable Fly", sets, 1)]);
            let after = session(push, vec![logged(&library, "Cable Fly", sets + 1, 1)]);

            let p0 = region(&build_report(&before, push, &library, &config), "Chest", "Mid").progress;
            let p1 = region(&build_report(&after, push, &library, &config), "Chest", "Mid").progress;
            prop_assert!(p1 >= p0);
            prop_assert!(p1 <= 1.0);
        }
    }

    #[test]
    fn test_large_score_still_full_progress() {
        assert_eq!(region_progress(100.0, 4.0), 1.0);
    }
}
