//! Core domain types consumed by the analytics engines.
//!
//! This module defines the read-only snapshot the host hands to the engines:
//! - Reference data (exercises, muscle groups/regions, splits)
//! - Logged data (sessions, logged exercises, logged sets)
//!
//! Relationships are expressed as ids rather than back-references. The
//! [`Library`] resolves ids to reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Reference Data
// ============================================================================

/// How strongly an exercise trains a muscle region
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleRole {
    Primary,
    Secondary,
}

/// Link from an exercise to one region it trains
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleMap {
    pub region_id: Uuid,
    pub role: MuscleRole,
}

/// An exercise definition (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub equipment: String,
    pub muscle_maps: Vec<MuscleMap>,
}

/// A region within a muscle group (e.g., Chest / Upper)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleRegion {
    pub id: Uuid,
    pub name: String,
    pub group_id: Uuid,
}

/// A muscle group and the ordered regions it owns
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleGroup {
    pub id: Uuid,
    pub name: String,
    pub regions: Vec<MuscleRegion>,
}

/// A split (workout type) and the groups it targets, in display order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutType {
    pub id: Uuid,
    pub name: String,
    pub muscle_group_ids: Vec<Uuid>,
}

/// Shared reference data: exercises, muscle taxonomy and splits
#[derive(Clone, Debug, Default)]
pub struct Library {
    pub exercises: HashMap<Uuid, Exercise>,
    pub groups: HashMap<Uuid, MuscleGroup>,
    pub splits: HashMap<Uuid, WorkoutType>,
    /// `(exercise name, region path)` references that did not resolve when
    /// the exercise was added
    pub unresolved_regions: Vec<(String, String)>,
}

// ============================================================================
// Logged Data
// ============================================================================

/// One logged set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub id: Uuid,
    pub reps: i32,
    pub weight: f64,
    pub is_warmup: bool,
    pub created_at: DateTime<Utc>,
}

impl LoggedSet {
    /// Working sets are the only sets that count toward any metric
    pub fn is_working(&self) -> bool {
        !self.is_warmup
    }

    /// weight × reps
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// An exercise as performed within one session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedExercise {
    pub id: Uuid,
    /// Session-local display order
    pub order_index: i32,
    pub exercise_id: Uuid,
    pub sets: Vec<LoggedSet>,
}

impl LoggedExercise {
    pub fn working_sets(&self) -> impl Iterator<Item = &LoggedSet> {
        self.sets.iter().filter(|s| s.is_working())
    }

    pub fn working_set_count(&self) -> u32 {
        self.working_sets().count() as u32
    }
}

/// A recorded workout session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// `None` while the session is still active
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub workout_type_id: Option<Uuid>,
    pub logged_exercises: Vec<LoggedExercise>,
}

impl WorkoutSession {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Every working set in the session, across all logged exercises
    pub fn working_sets(&self) -> impl Iterator<Item = &LoggedSet> {
        self.logged_exercises.iter().flat_map(|e| e.working_sets())
    }
}
