//! Flat CSV export of the set log.
//!
//! One row per logged set, warmups included and flagged, so the file can be
//! pivoted in a spreadsheet without re-deriving volume or e1RM.

use crate::stats::estimated_one_rep_max;
use crate::{Error, Library, LoggedExercise, Result, WorkoutSession};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    session_id: String,
    started_at: String,
    split: String,
    exercise: String,
    set_index: usize,
    reps: i32,
    weight: f64,
    is_warmup: bool,
    volume: f64,
    estimated_one_rm: f64,
}

/// Write every set of `sessions` to `path`, oldest session first
///
/// Returns the number of rows written. Volume and e1RM are reported as 0
/// for warmup sets.
pub fn export_sets_csv(sessions: &[WorkoutSession], library: &Library, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut ordered: Vec<&WorkoutSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.started_at);

    let mut rows = 0;
    for session in ordered {
        let split = session
            .workout_type_id
            .and_then(|id| library.split(id))
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let mut logged: Vec<&LoggedExercise> = session.logged_exercises.iter().collect();
        logged.sort_by_key(|e| e.order_index);

        for exercise in logged {
            let name = library
                .exercise(exercise.exercise_id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| exercise.exercise_id.to_string());

            let mut sets: Vec<_> = exercise.sets.iter().collect();
            sets.sort_by_key(|s| s.created_at);

            for (index, set) in sets.into_iter().enumerate() {
                let (volume, estimated_one_rm) = if set.is_working() {
                    (set.volume(), estimated_one_rep_max(set.weight, set.reps))
                } else {
                    (0.0, 0.0)
                };

                writer.serialize(CsvRow {
                    session_id: session.id.to_string(),
                    started_at: session.started_at.to_rfc3339(),
                    split: split.clone(),
                    exercise: name.clone(),
                    set_index: index + 1,
                    reps: set.reps,
                    weight: set.weight,
                    is_warmup: set.is_warmup,
                    volume,
                    estimated_one_rm,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("Failed to finish CSV export: {}", e)))?;
    file.sync_all()?;

    tracing::info!("Wrote {} set rows to {:?}", rows, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_library, LoggedSet};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_export_sets_csv() {
        crate::logging::init_test();

        let library = build_default_library();
        let squat = library.exercise_by_name("Back Squat").unwrap();
        let lower = library.split_by_name("Lower").unwrap();
        let started = Utc.with_ymd_and_hms(2024, 4, 2, 6, 0, 0).unwrap();

        let session = WorkoutSession {
            id: Uuid::new_v4(),
            started_at: started,
            ended_at: None,
            notes: String::new(),
            workout_type_id: Some(lower.id),
            logged_exercises: vec![LoggedExercise {
                id: Uuid::new_v4(),
                order_index: 0,
                exercise_id: squat.id,
                sets: vec![
                    LoggedSet {
                        id: Uuid::new_v4(),
                        reps: 5,
                        weight: 100.0,
                        is_warmup: false,
                        created_at: started + Duration::minutes(5),
                    },
                    LoggedSet {
                        id: Uuid::new_v4(),
                        reps: 10,
                        weight: 60.0,
                        is_warmup: true,
                        created_at: started,
                    },
                ],
            }],
        };

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sets.csv");
        let rows = export_sets_csv(&[session], &library, &path).unwrap();
        assert_eq!(rows, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "session_id");
        assert_eq!(&headers[9], "estimated_one_rm");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        // Warmup was created first
        assert_eq!(&records[0][4], "1");
        assert_eq!(&records[0][7], "true");
        assert_eq!(&records[0][8], "0.0");
        assert_eq!(&records[1][2], "Lower");
        assert_eq!(&records[1][3], "Back Squat");
        assert_eq!(&records[1][8], "500.0");
    }

    #[test]
    fn test_export_empty_history_writes_no_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.csv");
        let rows = export_sets_csv(&[], &build_default_library(), &path).unwrap();
        assert_eq!(rows, 0);
        assert!(path.exists());
    }
}
