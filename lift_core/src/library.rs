//! Reference library: muscle taxonomy, splits and the curated exercise table.
//!
//! The library is shared reference data. Sessions point into it by id and the
//! engines resolve those ids here instead of walking object back-references.
//! Ids are derived from names (UUID v5) so the same exercise or region keeps
//! its id across runs and across exported snapshots.

use crate::types::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Namespace for name-derived library ids
const LIBRARY_NAMESPACE: Uuid = Uuid::from_u128(0x5d0c_93a1_7f4e_4b2a_9e61_0c2f_8d4b_17a3);

/// Cached default library - built once and reused across all operations
static DEFAULT_LIBRARY: Lazy<Library> = Lazy::new(build_default_library);

/// Get a reference to the cached default library
pub fn default_library() -> &'static Library {
    &DEFAULT_LIBRARY
}

/// Curated exercise definition, as found in the seed table or user config
///
/// Region references are `"Group/Region"` paths (e.g. `"Chest/Upper"`); a
/// bare region name is accepted when it is unambiguous.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSeed {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl ExerciseSeed {
    fn from_table(
        name: &str,
        category: &str,
        equipment: &str,
        primary: &[&str],
        secondary: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            equipment: equipment.into(),
            primary: primary.iter().map(|s| s.to_string()).collect(),
            secondary: secondary.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("Chest", &["Upper", "Mid", "Lower"]),
    ("Triceps", &["Long", "Lateral", "Medial"]),
    ("Shoulders", &["Anterior", "Lateral", "Posterior"]),
    ("Back", &["Lats", "Upper Back", "Lower Back"]),
    ("Biceps", &["Long", "Short", "Brachialis"]),
    ("Legs", &["Quads", "Hamstrings", "Glutes", "Calves"]),
    ("Core", &["Upper Abs", "Lower Abs", "Obliques"]),
];

const DEFAULT_SPLITS: &[(&str, &[&str])] = &[
    ("Push", &["Chest", "Triceps", "Shoulders"]),
    ("Pull", &["Back", "Biceps", "Shoulders"]),
    ("Lower", &["Legs", "Core"]),
    (
        "Full Body",
        &["Chest", "Triceps", "Shoulders", "Back", "Biceps", "Legs", "Core"],
    ),
];

type SeedRow = (&'static str, &'static str, &'static str, &'static [&'static str], &'static [&'static str]);

const DEFAULT_EXERCISES: &[SeedRow] = &[
    // Chest
    ("Barbell Bench Press", "Chest", "Barbell", &["Chest/Mid"], &["Triceps/Lateral", "Shoulders/Anterior"]),
    ("Incline Dumbbell Press", "Chest", "Dumbbell", &["Chest/Upper"], &["Shoulders/Anterior", "Triceps/Lateral"]),
    ("Decline Bench Press", "Chest", "Barbell", &["Chest/Lower"], &["Triceps/Lateral"]),
    ("Cable Fly", "Chest", "Cable", &["Chest/Mid"], &[]),
    ("Push-Up", "Chest", "Bodyweight", &["Chest/Mid"], &["Triceps/Medial", "Shoulders/Anterior"]),
    ("Dip", "Chest", "Bodyweight", &["Chest/Lower", "Triceps/Medial"], &["Shoulders/Anterior"]),
    // Triceps
    ("Overhead Triceps Extension", "Triceps", "Cable", &["Triceps/Long"], &[]),
    ("Skull Crusher", "Triceps", "EZ Bar", &["Triceps/Long"], &["Triceps/Lateral"]),
    ("Triceps Pushdown", "Triceps", "Cable", &["Triceps/Lateral", "Triceps/Medial"], &[]),
    ("Close-Grip Bench Press", "Triceps", "Barbell", &["Triceps/Medial"], &["Chest/Mid", "Triceps/Lateral"]),
    // Shoulders
    ("Overhead Press", "Shoulders", "Barbell", &["Shoulders/Anterior"], &["Shoulders/Lateral", "Triceps/Lateral"]),
    ("Lateral Raise", "Shoulders", "Dumbbell", &["Shoulders/Lateral"], &[]),
    ("Face Pull", "Shoulders", "Cable", &["Shoulders/Posterior"], &["Back/Upper Back"]),
    ("Rear Delt Fly", "Shoulders", "Dumbbell", &["Shoulders/Posterior"], &["Back/Upper Back"]),
    // Back
    ("Lat Pulldown", "Back", "Cable", &["Back/Lats"], &["Biceps/Long"]),
    ("Pull-Up", "Back", "Bodyweight", &["Back/Lats"], &["Biceps/Short", "Back/Upper Back"]),
    ("Barbell Row", "Back", "Barbell", &["Back/Upper Back"], &["Back/Lats", "Biceps/Brachialis"]),
    ("Seated Cable Row", "Back", "Cable", &["Back/Upper Back"], &["Back/Lats"]),
    ("Deadlift", "Back", "Barbell", &["Back/Lower Back", "Legs/Glutes", "Legs/Hamstrings"], &["Legs/Quads"]),
    ("Back Extension", "Back", "Bodyweight", &["Back/Lower Back"], &["Legs/Glutes"]),
    // Biceps
    ("Barbell Curl", "Biceps", "Barbell", &["Biceps/Long", "Biceps/Short"], &[]),
    ("Preacher Curl", "Biceps", "EZ Bar", &["Biceps/Short"], &[]),
    ("Hammer Curl", "Biceps", "Dumbbell", &["Biceps/Brachialis"], &["Biceps/Long"]),
    ("Incline Dumbbell Curl", "Biceps", "Dumbbell", &["Biceps/Long"], &[]),
    // Legs
    ("Back Squat", "Legs", "Barbell", &["Legs/Quads", "Legs/Glutes"], &["Legs/Hamstrings", "Back/Lower Back"]),
    ("Leg Press", "Legs", "Machine", &["Legs/Quads"], &["Legs/Glutes"]),
    ("Romanian Deadlift", "Legs", "Barbell", &["Legs/Hamstrings", "Legs/Glutes"], &["Back/Lower Back"]),
    ("Leg Curl", "Legs", "Machine", &["Legs/Hamstrings"], &[]),
    ("Leg Extension", "Legs", "Machine", &["Legs/Quads"], &[]),
    ("Hip Thrust", "Legs", "Barbell", &["Legs/Glutes"], &["Legs/Hamstrings"]),
    ("Walking Lunge", "Legs", "Dumbbell", &["Legs/Quads", "Legs/Glutes"], &[]),
    ("Standing Calf Raise", "Legs", "Machine", &["Legs/Calves"], &[]),
    // Core
    ("Cable Crunch", "Core", "Cable", &["Core/Upper Abs"], &[]),
    ("Hanging Leg Raise", "Core", "Bodyweight", &["Core/Lower Abs"], &["Core/Obliques"]),
    ("Russian Twist", "Core", "Bodyweight", &["Core/Obliques"], &[]),
    // No curated regions: falls back to every region of its category group
    ("Plank", "Core", "Bodyweight", &[], &[]),
];

/// Builds the default library with the built-in taxonomy, splits and exercises
///
/// **Note**: For production use, prefer `default_library()` which returns a
/// cached reference. This function is retained for testing and for callers
/// that extend the library with custom exercises.
pub fn build_default_library() -> Library {
    let mut library = Library::default();

    for (group, regions) in DEFAULT_GROUPS {
        library.add_group(group, regions);
    }

    for (split, groups) in DEFAULT_SPLITS {
        library.add_split(split, groups);
    }

    for (name, category, equipment, primary, secondary) in DEFAULT_EXERCISES {
        library.add_exercise(&ExerciseSeed::from_table(
            name, category, equipment, primary, secondary,
        ));
    }

    library
}

fn library_id(kind: &str, key: &str) -> Uuid {
    let name = format!("{}:{}", kind, key.trim().to_lowercase());
    Uuid::new_v5(&LIBRARY_NAMESPACE, name.as_bytes())
}

impl Library {
    /// Add a muscle group with its ordered regions; returns the group id
    pub fn add_group(&mut self, name: &str, regions: &[&str]) -> Uuid {
        let group_id = library_id("group", name);
        let regions = regions
            .iter()
            .map(|region| MuscleRegion {
                id: library_id("region", &format!("{}/{}", name, region)),
                name: region.to_string(),
                group_id,
            })
            .collect();

        self.groups.insert(
            group_id,
            MuscleGroup {
                id: group_id,
                name: name.to_string(),
                regions,
            },
        );
        group_id
    }

    /// Add a split targeting the named groups; unknown group names are skipped
    pub fn add_split(&mut self, name: &str, group_names: &[&str]) -> Uuid {
        let split_id = library_id("split", name);
        let muscle_group_ids = group_names
            .iter()
            .filter_map(|group| {
                let found = self.group_by_name(group).map(|g| g.id);
                if found.is_none() {
                    tracing::warn!("Split '{}' references unknown group '{}'", name, group);
                }
                found
            })
            .collect();

        self.splits.insert(
            split_id,
            WorkoutType {
                id: split_id,
                name: name.to_string(),
                muscle_group_ids,
            },
        );
        split_id
    }

    /// Insert or replace an exercise from its curated definition
    ///
    /// Replacing an existing exercise (matched by name, case-insensitive)
    /// discards its previous muscle maps. When none of the curated regions
    /// resolve, every region of the group named like the exercise category is
    /// mapped as primary.
    pub fn add_exercise(&mut self, seed: &ExerciseSeed) -> Uuid {
        let name = seed.name.trim();
        let id = library_id("exercise", name);

        self.unresolved_regions
            .retain(|(exercise, _)| !exercise.eq_ignore_ascii_case(name));

        let mut muscle_maps: Vec<MuscleMap> = Vec::new();
        let roles = seed
            .primary
            .iter()
            .map(|path| (path, MuscleRole::Primary))
            .chain(seed.secondary.iter().map(|path| (path, MuscleRole::Secondary)));

        for (path, role) in roles {
            match self.resolve_region(path) {
                Some(region_id) if !muscle_maps.iter().any(|m| m.region_id == region_id) => {
                    muscle_maps.push(MuscleMap { region_id, role });
                }
                Some(_) => {}
                None => {
                    tracing::warn!("Exercise '{}' references unknown region '{}'", name, path);
                    self.unresolved_regions
                        .push((name.to_string(), path.to_string()));
                }
            }
        }

        if muscle_maps.is_empty() {
            if let Some(group) = self.group_by_name(&seed.category) {
                tracing::debug!(
                    "Exercise '{}' has no curated regions, mapping all of '{}'",
                    name,
                    group.name
                );
                muscle_maps = group
                    .regions
                    .iter()
                    .map(|r| MuscleMap {
                        region_id: r.id,
                        role: MuscleRole::Primary,
                    })
                    .collect();
            }
        }

        self.exercises.insert(
            id,
            Exercise {
                id,
                name: name.to_string(),
                category: seed.category.clone(),
                equipment: seed.equipment.clone(),
                muscle_maps,
            },
        );
        id
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.get(&id)
    }

    pub fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        let name = name.trim();
        self.exercises
            .values()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn group(&self, id: Uuid) -> Option<&MuscleGroup> {
        self.groups.get(&id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&MuscleGroup> {
        let name = name.trim();
        self.groups.values().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn split(&self, id: Uuid) -> Option<&WorkoutType> {
        self.splits.get(&id)
    }

    pub fn split_by_name(&self, name: &str) -> Option<&WorkoutType> {
        let name = name.trim();
        self.splits.values().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Groups targeted by a split, in the split's order
    pub fn split_groups(&self, split: &WorkoutType) -> Vec<&MuscleGroup> {
        split
            .muscle_group_ids
            .iter()
            .filter_map(|id| self.groups.get(id))
            .collect()
    }

    /// Ids of every region owned by the split's groups
    pub fn split_region_ids(&self, split: &WorkoutType) -> HashSet<Uuid> {
        self.split_groups(split)
            .into_iter()
            .flat_map(|g| g.regions.iter().map(|r| r.id))
            .collect()
    }

    /// Look up a region together with its owning group
    pub fn region(&self, id: Uuid) -> Option<(&MuscleGroup, &MuscleRegion)> {
        self.groups
            .values()
            .find_map(|g| g.regions.iter().find(|r| r.id == id).map(|r| (g, r)))
    }

    /// Resolve `"Group/Region"` (or an unambiguous bare region name)
    pub fn resolve_region(&self, path: &str) -> Option<Uuid> {
        if let Some((group, region)) = path.split_once('/') {
            let group = self.group_by_name(group)?;
            return group
                .regions
                .iter()
                .find(|r| r.name.eq_ignore_ascii_case(region.trim()))
                .map(|r| r.id);
        }

        let mut matches = self
            .groups
            .values()
            .flat_map(|g| g.regions.iter())
            .filter(|r| r.name.eq_ignore_ascii_case(path.trim()));

        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only.id),
            _ => None,
        }
    }

    /// Validate library consistency
    ///
    /// Returns a sorted list of problems; empty means the library is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut exercise_names: HashMap<String, usize> = HashMap::new();

        for (id, exercise) in &self.exercises {
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
            *exercise_names
                .entry(exercise.name.trim().to_lowercase())
                .or_default() += 1;

            for map in &exercise.muscle_maps {
                if self.region(map.region_id).is_none() {
                    errors.push(format!(
                        "Exercise '{}' maps to unknown region '{}'",
                        exercise.name, map.region_id
                    ));
                }
            }
        }

        for (exercise, path) in &self.unresolved_regions {
            errors.push(format!(
                "Exercise '{}' references unknown region '{}'",
                exercise, path
            ));
        }

        for (name, count) in exercise_names {
            if count > 1 {
                errors.push(format!("Exercise name '{}' is used {} times", name, count));
            }
        }

        for (id, group) in &self.groups {
            if id != &group.id {
                errors.push(format!(
                    "Group key '{}' doesn't match group.id '{}'",
                    id, group.id
                ));
            }
            if group.name.trim().is_empty() {
                errors.push(format!("Group '{}' has empty name", id));
            }
            let mut seen = HashSet::new();
            for region in &group.regions {
                if region.group_id != group.id {
                    errors.push(format!(
                        "Region '{}' is listed under '{}' but belongs to '{}'",
                        region.name, group.name, region.group_id
                    ));
                }
                if !seen.insert(region.name.to_lowercase()) {
                    errors.push(format!(
                        "Group '{}' lists region '{}' twice",
                        group.name, region.name
                    ));
                }
            }
        }

        for (id, split) in &self.splits {
            if id != &split.id {
                errors.push(format!(
                    "Split key '{}' doesn't match split.id '{}'",
                    id, split.id
                ));
            }
            if split.name.trim().is_empty() {
                errors.push(format!("Split '{}' has empty name", id));
            }
            for group_id in &split.muscle_group_ids {
                if !self.groups.contains_key(group_id) {
                    errors.push(format!(
                        "Split '{}' references unknown group '{}'",
                        split.name, group_id
                    ));
                }
            }
        }

        errors.sort();
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_library_validates() {
        let library = build_default_library();
        let errors = library.validate();
        assert!(
            errors.is_empty(),
            "Default library has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_default_taxonomy_shape() {
        let library = build_default_library();
        assert_eq!(library.groups.len(), 7);
        assert_eq!(library.splits.len(), 4);

        let legs = library.group_by_name("legs").unwrap();
        let names: Vec<_> = legs.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Quads", "Hamstrings", "Glutes", "Calves"]);
    }

    #[test]
    fn test_split_groups_keep_order() {
        let library = build_default_library();
        let push = library.split_by_name("Push").unwrap();
        let names: Vec<_> = library
            .split_groups(push)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Chest", "Triceps", "Shoulders"]);
    }

    #[test]
    fn test_ids_are_stable_across_builds() {
        let a = build_default_library();
        let b = build_default_library();
        let bench_a = a.exercise_by_name("Barbell Bench Press").unwrap();
        let bench_b = b.exercise_by_name("barbell bench press").unwrap();
        assert_eq!(bench_a.id, bench_b.id);
        assert_eq!(bench_a.muscle_maps, bench_b.muscle_maps);
    }

    #[test]
    fn test_resolve_region_paths() {
        let library = build_default_library();
        assert!(library.resolve_region("Chest/Upper").is_some());
        assert!(library.resolve_region("chest / upper").is_some());
        assert!(library.resolve_region("Quads").is_some());
        // "Lateral" exists under Triceps and Shoulders
        assert!(library.resolve_region("Lateral").is_none());
        assert!(library.resolve_region("Chest/Nowhere").is_none());
    }

    #[test]
    fn test_curated_roles() {
        let library = build_default_library();
        let bench = library.exercise_by_name("Barbell Bench Press").unwrap();
        let mid = library.resolve_region("Chest/Mid").unwrap();
        let anterior = library.resolve_region("Shoulders/Anterior").unwrap();

        let role_of = |id| {
            bench
                .muscle_maps
                .iter()
                .find(|m| m.region_id == id)
                .map(|m| m.role)
        };
        assert_eq!(role_of(mid), Some(MuscleRole::Primary));
        assert_eq!(role_of(anterior), Some(MuscleRole::Secondary));
    }

    #[test]
    fn test_category_fallback_when_no_regions() {
        let library = build_default_library();
        let plank = library.exercise_by_name("Plank").unwrap();
        let core = library.group_by_name("Core").unwrap();
        assert_eq!(plank.muscle_maps.len(), core.regions.len());
        assert!(plank
            .muscle_maps
            .iter()
            .all(|m| m.role == MuscleRole::Primary));
    }

    #[test]
    fn test_custom_exercise_replaces_existing_maps() {
        let mut library = build_default_library();
        let before = library.exercises.len();

        let id = library.add_exercise(&ExerciseSeed {
            name: "cable fly".into(),
            category: "Chest".into(),
            equipment: "Cable".into(),
            primary: vec!["Chest/Upper".into()],
            secondary: vec![],
        });

        assert_eq!(library.exercises.len(), before);
        let fly = library.exercise(id).unwrap();
        assert_eq!(fly.muscle_maps.len(), 1);
        assert_eq!(
            fly.muscle_maps[0].region_id,
            library.resolve_region("Chest/Upper").unwrap()
        );
    }

    #[test]
    fn test_validate_reports_unknown_references() {
        let mut library = build_default_library();
        let ghost = Uuid::new_v4();

        let push_id = library.split_by_name("Push").unwrap().id;
        if let Some(push) = library.splits.get_mut(&push_id) {
            push.muscle_group_ids.push(ghost);
        }

        let errors = library.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unknown group"));
    }

    #[test]
    fn test_validate_reports_unresolved_region_paths() {
        let mut library = build_default_library();
        library.add_exercise(&ExerciseSeed {
            name: "Landmine Press".into(),
            category: "Shoulders".into(),
            equipment: "Barbell".into(),
            primary: vec!["Shoulders/Anteriorr".into()],
            secondary: vec![],
        });

        let errors = library.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Shoulders/Anteriorr"));

        // Replacing the exercise with a clean definition clears the report
        library.add_exercise(&ExerciseSeed {
            name: "landmine press".into(),
            category: "Shoulders".into(),
            equipment: "Barbell".into(),
            primary: vec!["Shoulders/Anterior".into()],
            secondary: vec![],
        });
        assert!(library.validate().is_empty());
    }

    #[test]
    fn test_cached_library_matches_built() {
        let cached = default_library();
        let built = build_default_library();
        assert_eq!(cached.exercises.len(), built.exercises.len());
    }
}
