#![forbid(unsafe_code)]

//! Muscle coverage and training analytics for logged strength workouts.
//!
//! This crate provides:
//! - Domain snapshot types (sessions, logged exercises and sets)
//! - Reference library (muscle taxonomy, splits, curated exercises)
//! - Stats, coverage, weekly goal, insight and progressive overload engines
//! - Dashboard trends
//! - Configuration, logging and snapshot/CSV adapters
//!
//! The engines are pure functions of their arguments: they perform no I/O
//! and hold no state between calls.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod library;
pub mod keywords;
pub mod stats;
pub mod coverage;
pub mod weekly;
pub mod insights;
pub mod overload;
pub mod trends;
pub mod snapshot;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use library::{build_default_library, default_library, ExerciseSeed};
pub use coverage::{build_report, CoverageReport, GroupCoverage, RegionCoverage};
pub use weekly::{
    completed_sessions_this_week, remaining_sessions, weekly_consistency, WeekDefinition,
    WeeklyConsistencySummary,
};
pub use insights::{tips, tips_for_sessions, InsightInputs, InsightKind, InsightTip};
pub use overload::{
    round_to_nearest_five, suggest, suggest_for_exercise, working_set_history, OverloadStep,
    ProgressiveSuggestion, WorkingWeightRecommendation,
};
pub use snapshot::{export_bundle, import_bundle, load_bundle, save_bundle, WorkoutExportBundle};
