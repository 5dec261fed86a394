use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Muscle groups tracked by the recovery model
///
/// The declaration order is the canonical enumeration order: full-body
/// results and recommendations always list muscles in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Core,
}

impl MuscleGroup {
    /// All muscle groups in enumeration order
    pub const ALL: [MuscleGroup; 11] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Forearms,
        MuscleGroup::Quads,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::Core,
    ];

    /// Lowercase name used in display and recommendation text
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Core => "core",
        }
    }

    /// Baseline hours for the muscle to recover from a light session
    ///
    /// Large muscle groups that take heavy compound loading (back, legs)
    /// need roughly three days; small or endurance-oriented groups less.
    pub fn base_recovery_hours(&self) -> f64 {
        match self {
            MuscleGroup::Core => 24.0,
            MuscleGroup::Forearms => 36.0,
            MuscleGroup::Chest
            | MuscleGroup::Shoulders
            | MuscleGroup::Biceps
            | MuscleGroup::Triceps
            | MuscleGroup::Calves => 48.0,
            MuscleGroup::Back
            | MuscleGroup::Quads
            | MuscleGroup::Hamstrings
            | MuscleGroup::Glutes => 72.0,
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        MuscleGroup::ALL
            .iter()
            .copied()
            .find(|m| m.name() == needle)
            .ok_or_else(|| format!("Unknown muscle group: {}", s))
    }
}

/// Training volume of one completed session, per muscle group
///
/// Produced by the caller from workout logs after mapping exercises onto
/// muscle groups. A muscle missing from the map was not trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutVolumeRecord {
    /// When the session was completed
    pub date: DateTime<Utc>,

    /// Working sets performed per muscle group
    #[serde(default)]
    pub muscle_volume: BTreeMap<MuscleGroup, u32>,
}

impl WorkoutVolumeRecord {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            muscle_volume: BTreeMap::new(),
        }
    }

    /// Builder-style helper to record sets for a muscle
    pub fn with_sets(mut self, muscle: MuscleGroup, sets: u32) -> Self {
        self.muscle_volume.insert(muscle, sets);
        self
    }

    /// Sets performed for `muscle` in this session (0 if untrained)
    pub fn sets_for(&self, muscle: MuscleGroup) -> u32 {
        self.muscle_volume.get(&muscle).copied().unwrap_or(0)
    }
}

/// A single completed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPerformance {
    /// Load lifted
    pub weight: f64,

    /// Repetitions completed
    pub reps: u32,

    /// Rate of perceived exertion (1-10), if the lifter logged one
    #[serde(default)]
    pub rpe: Option<f64>,

    /// Warm-up sets are ignored when suggesting loads
    #[serde(default)]
    pub is_warmup: bool,
}

impl SetPerformance {
    pub fn new(weight: f64, reps: u32, rpe: Option<f64>) -> Self {
        Self {
            weight,
            reps,
            rpe,
            is_warmup: false,
        }
    }

    pub fn warmup(weight: f64, reps: u32) -> Self {
        Self {
            weight,
            reps,
            rpe: None,
            is_warmup: true,
        }
    }
}

/// One exercise as logged in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistory {
    pub exercise_name: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub sets: Vec<SetPerformance>,
}

impl ExerciseHistory {
    /// Working (non warm-up) sets in logged order
    pub fn working_sets(&self) -> impl Iterator<Item = &SetPerformance> {
        self.sets.iter().filter(|s| !s.is_warmup)
    }
}

/// Weight unit preference, used only for labelling output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Lbs
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Lbs => write!(f, "lbs"),
            WeightUnit::Kg => write!(f, "kg"),
        }
    }
}

/// Round half toward positive infinity
///
/// Every rounded quantity in the model uses this convention, so a value of
/// exactly -0.5 rounds to 0 rather than -1.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_muscle_group_order() {
        assert_eq!(MuscleGroup::ALL.len(), 11);
        assert_eq!(MuscleGroup::ALL[0], MuscleGroup::Chest);
        assert_eq!(MuscleGroup::ALL[10], MuscleGroup::Core);

        let mut sorted = MuscleGroup::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, MuscleGroup::ALL.to_vec());
    }

    #[test]
    fn test_muscle_group_parsing() {
        assert_eq!("Chest".parse::<MuscleGroup>().unwrap(), MuscleGroup::Chest);
        assert_eq!(" hamstrings ".parse::<MuscleGroup>().unwrap(), MuscleGroup::Hamstrings);
        assert!("lats".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_muscle_group_serialization() {
        let json = serde_json::to_string(&MuscleGroup::Quads).unwrap();
        assert_eq!(json, "\"quads\"");

        let deserialized: MuscleGroup = serde_json::from_str("\"glutes\"").unwrap();
        assert_eq!(deserialized, MuscleGroup::Glutes);
    }

    #[test]
    fn test_base_recovery_hours_table() {
        assert_eq!(MuscleGroup::Core.base_recovery_hours(), 24.0);
        assert_eq!(MuscleGroup::Forearms.base_recovery_hours(), 36.0);
        assert_eq!(MuscleGroup::Chest.base_recovery_hours(), 48.0);
        assert_eq!(MuscleGroup::Calves.base_recovery_hours(), 48.0);
        assert_eq!(MuscleGroup::Back.base_recovery_hours(), 72.0);
        assert_eq!(MuscleGroup::Glutes.base_recovery_hours(), 72.0);
    }

    #[test]
    fn test_volume_record_parsing() {
        let json = r#"{
            "date": "2024-03-01T18:30:00Z",
            "muscle_volume": { "chest": 12, "triceps": 6 }
        }"#;
        let record: WorkoutVolumeRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date, Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap());
        assert_eq!(record.sets_for(MuscleGroup::Chest), 12);
        assert_eq!(record.sets_for(MuscleGroup::Triceps), 6);
        assert_eq!(record.sets_for(MuscleGroup::Back), 0);
    }

    #[test]
    fn test_set_performance_defaults() {
        let set: SetPerformance = serde_json::from_str(r#"{"weight": 135.0, "reps": 8}"#).unwrap();
        assert_eq!(set.rpe, None);
        assert!(!set.is_warmup);
    }

    #[test]
    fn test_working_sets_skip_warmups() {
        let history = ExerciseHistory {
            exercise_name: "Bench Press".to_string(),
            date: Utc::now(),
            sets: vec![
                SetPerformance::warmup(95.0, 10),
                SetPerformance::new(135.0, 8, Some(7.0)),
            ],
        };
        let working: Vec<_> = history.working_sets().collect();
        assert_eq!(working.len(), 1);
        assert_eq!(working[0].weight, 135.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(116.666), 117.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.6), -2.0);
    }
}
