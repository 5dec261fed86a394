// Library interface for liftrs modules
// This allows integration tests and benches to access the core functionality

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod one_rep_max;
pub mod progression;
pub mod recovery;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{LiftRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use one_rep_max::{
    calculate_1rm, calculate_weight_for_reps, get_rpe_percentage, get_weight_for_rpe,
};
pub use progression::{
    calculate_weight_suggestion, get_weight_from_history, ChangeType, Confidence,
    PeriodizationConfig, WeightSuggestion,
};
pub use recovery::{
    calculate_full_body_recovery, calculate_muscle_recovery, calculate_readiness_score,
    get_training_recommendation, MuscleRecoveryStatus, RecoveryStatus, TrainingRecommendation,
};
