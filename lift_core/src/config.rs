//! Configuration file support for lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`. Every
//! section is optional; missing values fall back to the engine defaults.

use crate::library::ExerciseSeed;
use crate::weekly::WeekDefinition;
use crate::{Error, MuscleRole, Result};
use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub coverage: CoverageConfig,

    #[serde(default)]
    pub weekly: WeeklyConfig,

    #[serde(default)]
    pub overload: OverloadConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Coverage scoring parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoverageConfig {
    /// Score at which a region reads 100% (4 primary working sets)
    #[serde(default = "default_target_score_per_region")]
    pub target_score_per_region: f64,

    /// Progress at or above which a region counts as covered
    #[serde(default = "default_covered_threshold")]
    pub covered_threshold: f64,

    #[serde(default = "default_primary_weight")]
    pub primary_weight: f64,

    #[serde(default = "default_secondary_weight")]
    pub secondary_weight: f64,

    /// Match exercise names against region keywords when an exercise has no
    /// curated map inside the split
    #[serde(default)]
    pub keyword_fallback: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            target_score_per_region: default_target_score_per_region(),
            covered_threshold: default_covered_threshold(),
            primary_weight: default_primary_weight(),
            secondary_weight: default_secondary_weight(),
            keyword_fallback: false,
        }
    }
}

impl CoverageConfig {
    /// Contribution of one working set for the given role
    pub fn weight_for(&self, role: MuscleRole) -> f64 {
        match role {
            MuscleRole::Primary => self.primary_weight,
            MuscleRole::Secondary => self.secondary_weight,
        }
    }
}

/// Weekly goal and calendar week parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyConfig {
    #[serde(default = "default_target_sessions")]
    pub target_sessions: i32,

    /// First day of the calendar week ("monday", "sun", ...)
    #[serde(default = "default_week_start")]
    pub week_start: String,

    /// Offset of the user's local time from UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            target_sessions: default_target_sessions(),
            week_start: default_week_start(),
            utc_offset_minutes: 0,
        }
    }
}

impl WeeklyConfig {
    /// Resolve the configured calendar week
    pub fn week_definition(&self) -> Result<WeekDefinition> {
        let week_start = self
            .week_start
            .parse::<Weekday>()
            .map_err(|_| Error::Config(format!("Unknown week_start '{}'", self.week_start)))?;

        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::Config(format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })?;

        Ok(WeekDefinition { week_start, offset })
    }
}

/// Progressive overload parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OverloadConfig {
    /// Reps to reach at a weight before adding load
    #[serde(default = "default_rep_goal")]
    pub rep_goal: i32,

    #[serde(default = "default_base_increment")]
    pub base_increment: f64,

    /// Increment for categories listed in `heavy_categories`
    #[serde(default = "default_heavy_increment")]
    pub heavy_increment: f64,

    /// Case-insensitive substrings of an exercise category
    #[serde(default = "default_heavy_categories")]
    pub heavy_categories: Vec<String>,

    /// Rep targets for the working-weight table
    #[serde(default = "default_target_reps")]
    pub target_reps: Vec<i32>,

    /// Earlier working sets considered for the 1RM estimate
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        Self {
            rep_goal: default_rep_goal(),
            base_increment: default_base_increment(),
            heavy_increment: default_heavy_increment(),
            heavy_categories: default_heavy_categories(),
            target_reps: default_target_reps(),
            history_limit: default_history_limit(),
        }
    }
}

/// User additions to the reference library
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    #[serde(default)]
    pub custom_exercises: Vec<ExerciseSeed>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_target_score_per_region() -> f64 {
    4.0
}

fn default_covered_threshold() -> f64 {
    0.75
}

fn default_primary_weight() -> f64 {
    1.0
}

fn default_secondary_weight() -> f64 {
    0.5
}

fn default_target_sessions() -> i32 {
    4
}

fn default_week_start() -> String {
    "monday".into()
}

fn default_rep_goal() -> i32 {
    10
}

fn default_base_increment() -> f64 {
    5.0
}

fn default_heavy_increment() -> f64 {
    10.0
}

fn default_heavy_categories() -> Vec<String> {
    vec!["legs".into(), "back".into()]
}

fn default_target_reps() -> Vec<i32> {
    vec![5, 8, 10]
}

fn default_history_limit() -> usize {
    20
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values the engines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.coverage.target_score_per_region <= 0.0 {
            return Err(Error::Config(
                "coverage.target_score_per_region must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.coverage.covered_threshold) {
            return Err(Error::Config(
                "coverage.covered_threshold must be within 0..=1".into(),
            ));
        }
        if self.coverage.primary_weight < 0.0 || self.coverage.secondary_weight < 0.0 {
            return Err(Error::Config(
                "coverage.primary_weight and secondary_weight must not be negative".into(),
            ));
        }
        if self.overload.rep_goal <= 0 {
            return Err(Error::Config("overload.rep_goal must be positive".into()));
        }
        if self.overload.target_reps.iter().any(|r| *r <= 0) {
            return Err(Error::Config(
                "overload.target_reps must all be positive".into(),
            ));
        }
        self.weekly.week_definition()?;
        Ok(())
    }
}
