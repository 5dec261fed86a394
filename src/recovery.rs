//! Per-muscle recovery and training readiness
//!
//! Estimates how recovered each muscle group is from the volume of its most
//! recent session, then aggregates the per-muscle picture into a readiness
//! score and a plain-language training recommendation.
//!
//! # Model
//!
//! Every muscle group has a baseline recovery window (24h for core up to 72h
//! for the large lower-body and back muscles). Higher session volume extends
//! that window:
//!
//! | Working sets | Extension |
//! |--------------|-----------|
//! | < 6          | +0%       |
//! | 6-11         | +25%      |
//! | 12-17        | +50%      |
//! | 18+          | +75%      |
//!
//! Recovery is then the fraction of that window which has elapsed since the
//! session, clamped to 0-100%:
//!
//! - **Recovered**: 80% or more
//! - **Recovering**: 40-79%
//! - **Fatigued**: below 40%
//!
//! Only the most recent session that trained a muscle counts. Older sessions
//! are not accumulated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::models::{round_half_up, MuscleGroup, WorkoutVolumeRecord};

/// Volume tiers as (minimum sets, window extension), highest first.
///
/// The extreme tier (24+) carries the same extension as the heavy tier; the
/// window never grows past +75%.
const VOLUME_TIERS: &[(u32, f64)] = &[(24, 0.75), (18, 0.75), (12, 0.50), (6, 0.25)];

/// Status rules as (minimum recovery percent, status), evaluated in order.
const STATUS_RULES: &[(u8, RecoveryStatus)] = &[
    (80, RecoveryStatus::Recovered),
    (40, RecoveryStatus::Recovering),
];

/// Readiness of a single muscle group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Fatigued,
    Recovering,
    Recovered,
}

impl RecoveryStatus {
    /// Classify a recovery percentage, first matching rule wins
    pub fn from_recovery_percent(recovery_percent: u8) -> Self {
        STATUS_RULES
            .iter()
            .find(|(min, _)| recovery_percent >= *min)
            .map(|(_, status)| *status)
            .unwrap_or(RecoveryStatus::Fatigued)
    }

    /// Display colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            RecoveryStatus::Recovered => "#22c55e",
            RecoveryStatus::Recovering => "#f59e0b",
            RecoveryStatus::Fatigued => "#ef4444",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecoveryStatus::Recovered => "Recovered",
            RecoveryStatus::Recovering => "Recovering",
            RecoveryStatus::Fatigued => "Fatigued",
        }
    }
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recovery estimate for one muscle group at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleRecoveryStatus {
    pub muscle: MuscleGroup,

    /// Remaining fatigue (0-100), always `100 - recovery_percent`
    pub fatigue_score: u8,

    /// Share of the recovery window already elapsed (0-100)
    pub recovery_percent: u8,

    pub status: RecoveryStatus,

    /// Display colour of `status`, see [`RecoveryStatus::color`]
    pub color: String,

    /// Whole hours until the recovery window closes
    pub hours_until_recovered: u32,

    /// Date of the most recent session that trained this muscle
    pub last_worked_date: Option<DateTime<Utc>>,

    /// Working sets in that session
    pub volume_score: u32,
}

impl MuscleRecoveryStatus {
    /// Status for a muscle with no recorded training
    pub fn fully_recovered(muscle: MuscleGroup) -> Self {
        Self {
            muscle,
            fatigue_score: 0,
            recovery_percent: 100,
            status: RecoveryStatus::Recovered,
            color: RecoveryStatus::Recovered.color().to_string(),
            hours_until_recovered: 0,
            last_worked_date: None,
            volume_score: 0,
        }
    }
}

/// Aggregated recommendation derived from a set of muscle statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecommendation {
    pub recommendation: String,
    pub ready_muscles: Vec<MuscleGroup>,
    pub avoid_muscles: Vec<MuscleGroup>,
}

/// Extension of the recovery window for a session of `volume` working sets
pub fn volume_modifier(volume: u32) -> f64 {
    VOLUME_TIERS
        .iter()
        .find(|(min_sets, _)| volume >= *min_sets)
        .map(|(_, modifier)| *modifier)
        .unwrap_or(0.0)
}

/// Total recovery window in hours for `muscle` after `volume` sets
pub fn total_recovery_hours(muscle: MuscleGroup, volume: u32) -> f64 {
    muscle.base_recovery_hours() * (1.0 + volume_modifier(volume))
}

/// Recovery status of `muscle` as of now
pub fn calculate_muscle_recovery(
    muscle: MuscleGroup,
    history: &[WorkoutVolumeRecord],
) -> MuscleRecoveryStatus {
    calculate_muscle_recovery_at(muscle, history, Utc::now())
}

/// Recovery status of `muscle` as of `now`
pub fn calculate_muscle_recovery_at(
    muscle: MuscleGroup,
    history: &[WorkoutVolumeRecord],
    now: DateTime<Utc>,
) -> MuscleRecoveryStatus {
    let last_session = history
        .iter()
        .filter(|record| record.sets_for(muscle) > 0)
        .reduce(|latest, record| if record.date > latest.date { record } else { latest });

    let Some(session) = last_session else {
        trace!(%muscle, "no training recorded");
        return MuscleRecoveryStatus::fully_recovered(muscle);
    };

    let volume = session.sets_for(muscle);
    let hours_since = (now - session.date).num_milliseconds() as f64 / 3_600_000.0;
    let total_hours = total_recovery_hours(muscle, volume);

    let recovery_percent = round_half_up(hours_since / total_hours * 100.0).clamp(0.0, 100.0) as u8;
    let hours_until_recovered = round_half_up(total_hours - hours_since).max(0.0) as u32;
    let status = RecoveryStatus::from_recovery_percent(recovery_percent);

    debug!(
        %muscle,
        volume,
        hours_since,
        total_hours,
        recovery_percent,
        %status,
        "muscle recovery estimated"
    );

    MuscleRecoveryStatus {
        muscle,
        fatigue_score: 100 - recovery_percent,
        recovery_percent,
        status,
        color: status.color().to_string(),
        hours_until_recovered,
        last_worked_date: Some(session.date),
        volume_score: volume,
    }
}

/// Recovery status of every muscle group as of now, in enumeration order
pub fn calculate_full_body_recovery(history: &[WorkoutVolumeRecord]) -> Vec<MuscleRecoveryStatus> {
    calculate_full_body_recovery_at(history, Utc::now())
}

/// Recovery status of every muscle group as of `now`, in enumeration order
pub fn calculate_full_body_recovery_at(
    history: &[WorkoutVolumeRecord],
    now: DateTime<Utc>,
) -> Vec<MuscleRecoveryStatus> {
    MuscleGroup::ALL
        .iter()
        .map(|muscle| calculate_muscle_recovery_at(*muscle, history, now))
        .collect()
}

/// Unweighted mean recovery across `statuses` (100 when empty)
pub fn calculate_readiness_score(statuses: &[MuscleRecoveryStatus]) -> u8 {
    if statuses.is_empty() {
        return 100;
    }

    let total: u32 = statuses.iter().map(|s| s.recovery_percent as u32).sum();
    let mean = total as f64 / statuses.len() as f64;
    round_half_up(mean).clamp(0.0, 100.0) as u8
}

/// Recommend what to train given the current muscle statuses
///
/// Three outcomes, checked in order:
/// 1. nothing fatigued: full body session
/// 2. at least three muscles recovered: train the first three
/// 3. otherwise: rest or light activity
pub fn get_training_recommendation(statuses: &[MuscleRecoveryStatus]) -> TrainingRecommendation {
    let ready_muscles: Vec<MuscleGroup> = statuses
        .iter()
        .filter(|s| s.status == RecoveryStatus::Recovered)
        .map(|s| s.muscle)
        .collect();

    let avoid_muscles: Vec<MuscleGroup> = statuses
        .iter()
        .filter(|s| s.status == RecoveryStatus::Fatigued)
        .map(|s| s.muscle)
        .collect();

    let recommendation = if avoid_muscles.is_empty() {
        "All muscle groups are ready - good day for a full body session".to_string()
    } else if ready_muscles.len() >= 3 {
        let focus: Vec<&str> = ready_muscles.iter().take(3).map(|m| m.name()).collect();
        format!("Focus on {} today", focus.join(", "))
    } else {
        "Most muscle groups are still fatigued - consider rest or light activity".to_string()
    };

    debug!(
        ready = ready_muscles.len(),
        avoid = avoid_muscles.len(),
        "training recommendation built"
    );

    TrainingRecommendation {
        recommendation,
        ready_muscles,
        avoid_muscles,
    }
}
