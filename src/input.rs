//! Reading training history from JSON files
//!
//! Both history kinds are stored as a JSON array: `WorkoutVolumeRecord`s for
//! recovery, `ExerciseHistory` entries for load suggestions. Dates are RFC 3339.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

use crate::error::{InputError, Result};
use crate::models::{ExerciseHistory, WorkoutVolumeRecord};

/// Read a JSON array of `T` from `path`
pub fn read_json_array<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| InputError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(path = %path.display(), records = records.len(), "history loaded");
    Ok(records)
}

/// Per-session muscle volume history
pub fn load_volume_history<P: AsRef<Path>>(path: P) -> Result<Vec<WorkoutVolumeRecord>> {
    read_json_array(path)
}

/// Per-exercise set history
pub fn load_exercise_history<P: AsRef<Path>>(path: P) -> Result<Vec<ExerciseHistory>> {
    read_json_array(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiftRsError;
    use crate::models::MuscleGroup;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_volume_history() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"date": "2024-05-30T18:00:00Z", "muscle_volume": {{"chest": 12, "triceps": 9}}}},
                {{"date": "2024-05-31T18:00:00Z", "muscle_volume": {{"quads": 15}}}}
            ]"#
        )
        .unwrap();

        let history = load_volume_history(file.path()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sets_for(MuscleGroup::Chest), 12);
        assert_eq!(history[1].sets_for(MuscleGroup::Quads), 15);
    }

    #[test]
    fn test_load_exercise_history() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "exercise_name": "Bench Press",
                "date": "2024-05-30T18:00:00Z",
                "sets": [
                    {{"weight": 95, "reps": 10, "is_warmup": true}},
                    {{"weight": 135, "reps": 8, "rpe": 7.5}}
                ]
            }}]"#
        )
        .unwrap();

        let history = load_exercise_history(file.path()).unwrap();
        assert_eq!(history[0].sets.len(), 2);
        assert!(history[0].sets[0].is_warmup);
        assert_eq!(history[0].sets[1].rpe, Some(7.5));
    }

    #[test]
    fn test_missing_file() {
        let err = load_volume_history("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LiftRsError::Input(InputError::FileNotFound { .. })));
    }

    #[test]
    fn test_unknown_muscle_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"date": "2024-05-30T18:00:00Z", "muscle_volume": {{"lats": 3}}}}]"#).unwrap();

        let err = load_volume_history(file.path()).unwrap_err();
        assert!(matches!(err, LiftRsError::Input(InputError::Parse { .. })));
    }
}
