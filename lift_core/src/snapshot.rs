//! Schema-versioned JSON snapshot of logged sessions.
//!
//! The bundle references splits and exercises by name so it survives library
//! rebuilds and can be exchanged with other installs. Reads take a shared
//! lock; writes go through a locked temp file that is renamed into place.

use crate::{Error, Library, LoggedExercise, LoggedSet, Result, WorkoutSession};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Name written when a split or exercise cannot be resolved
const UNKNOWN_NAME: &str = "Unknown";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExportBundle {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub sessions: Vec<WorkoutSessionDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionDto {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub workout_type_name: String,
    pub exercises: Vec<LoggedExerciseDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExerciseDto {
    pub name: String,
    pub order_index: i32,
    pub sets: Vec<LoggedSetDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedSetDto {
    pub reps: i32,
    pub weight: f64,
    pub is_warmup: bool,
    pub created_at: DateTime<Utc>,
}

/// Build a bundle from sessions; exercises are written in display order
pub fn export_bundle(
    sessions: &[WorkoutSession],
    library: &Library,
    exported_at: DateTime<Utc>,
) -> WorkoutExportBundle {
    let sessions = sessions
        .iter()
        .map(|session| {
            let mut logged: Vec<&LoggedExercise> = session.logged_exercises.iter().collect();
            logged.sort_by_key(|e| e.order_index);

            WorkoutSessionDto {
                id: session.id,
                started_at: session.started_at,
                ended_at: session.ended_at,
                notes: session.notes.clone(),
                workout_type_name: session
                    .workout_type_id
                    .and_then(|id| library.split(id))
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                exercises: logged
                    .into_iter()
                    .map(|e| LoggedExerciseDto {
                        name: library
                            .exercise(e.exercise_id)
                            .map(|x| x.name.clone())
                            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                        order_index: e.order_index,
                        sets: e
                            .sets
                            .iter()
                            .map(|s| LoggedSetDto {
                                reps: s.reps,
                                weight: s.weight,
                                is_warmup: s.is_warmup,
                                created_at: s.created_at,
                            })
                            .collect(),
                    })
                    .collect(),
            }
        })
        .collect();

    WorkoutExportBundle {
        schema_version: SCHEMA_VERSION,
        exported_at,
        sessions,
    }
}

/// Resolve a bundle against the library into domain sessions
///
/// Unknown split names leave the session without a split. Logged exercises
/// whose name is not in the library are dropped with a warning.
pub fn import_bundle(bundle: &WorkoutExportBundle, library: &Library) -> Result<Vec<WorkoutSession>> {
    if bundle.schema_version != SCHEMA_VERSION {
        return Err(Error::UnsupportedSchema(bundle.schema_version));
    }

    let mut sessions = Vec::with_capacity(bundle.sessions.len());
    let mut dropped = 0usize;

    for dto in &bundle.sessions {
        if let Some(ended_at) = dto.ended_at {
            if ended_at < dto.started_at {
                return Err(Error::Import(format!(
                    "Session {} ends before it starts",
                    dto.id
                )));
            }
        }

        let workout_type_id = library.split_by_name(&dto.workout_type_name).map(|s| s.id);
        if workout_type_id.is_none() {
            tracing::warn!(
                "Session {} references unknown split '{}'",
                dto.id,
                dto.workout_type_name
            );
        }

        let mut logged_exercises = Vec::with_capacity(dto.exercises.len());
        for exercise in &dto.exercises {
            let Some(resolved) = library.exercise_by_name(&exercise.name) else {
                tracing::warn!(
                    "Session {} references unknown exercise '{}', skipping",
                    dto.id,
                    exercise.name
                );
                dropped += 1;
                continue;
            };

            logged_exercises.push(LoggedExercise {
                id: Uuid::new_v4(),
                order_index: exercise.order_index,
                exercise_id: resolved.id,
                sets: exercise
                    .sets
                    .iter()
                    .map(|s| LoggedSet {
                        id: Uuid::new_v4(),
                        reps: s.reps,
                        weight: s.weight,
                        is_warmup: s.is_warmup,
                        created_at: s.created_at,
                    })
                    .collect(),
            });
        }

        sessions.push(WorkoutSession {
            id: dto.id,
            started_at: dto.started_at,
            ended_at: dto.ended_at,
            notes: dto.notes.clone(),
            workout_type_id,
            logged_exercises,
        });
    }

    tracing::info!(
        "Imported {} sessions ({} unknown exercises skipped)",
        sessions.len(),
        dropped
    );
    Ok(sessions)
}

/// Read a bundle with a shared lock
pub fn load_bundle(path: &Path) -> Result<WorkoutExportBundle> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    let bundle: WorkoutExportBundle = serde_json::from_str(&contents)?;
    tracing::debug!(
        "Loaded snapshot {:?} (schema {}, {} sessions)",
        path,
        bundle.schema_version,
        bundle.sessions.len()
    );
    Ok(bundle)
}

/// Atomically write a bundle as pretty JSON
pub fn save_bundle(bundle: &WorkoutExportBundle, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, bundle)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Saved snapshot with {} sessions to {:?}", bundle.sessions.len(), path);
    Ok(())
}
