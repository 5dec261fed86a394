//! Next-session load suggestions
//!
//! Suggests the working weight for an exercise's next session from the last
//! working set the lifter completed. The decision is a short ordered rule list
//! over reps achieved and perceived effort:
//!
//! 1. **Increase**: target reps hit at or below the maximum RPE
//! 2. **Deload**: more than two reps short of target, or a true max effort (RPE 10)
//! 3. **Maintain**: everything else
//!
//! Increases use a larger step for lower-body lifts, recognised from the
//! exercise name. Nothing is remembered between calls; the caller supplies the
//! last performance every time.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{round_half_up, ExerciseHistory, SetPerformance};

/// RPE assumed when a set was logged without one
pub const DEFAULT_RPE: f64 = 7.0;

/// Name fragments that mark an exercise as lower body
pub const LOWER_BODY_KEYWORDS: &[&str] = &[
    "squat",
    "deadlift",
    "leg press",
    "romanian",
    "lunge",
    "hip thrust",
    "leg curl",
    "leg extension",
    "calf",
];

/// Progression policy
///
/// Every field has a default, so callers (and config files) only need to
/// specify what they want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodizationConfig {
    /// Load added to upper-body lifts on progression
    pub upper_body_increment: f64,

    /// Load added to lower-body lifts on progression
    pub lower_body_increment: f64,

    /// Rep target used when the caller does not give one
    pub target_reps: u32,

    /// Highest RPE at which hitting the rep target still earns an increase
    pub max_rpe: f64,

    /// Fraction of the working weight removed on a deload
    pub deload_percentage: f64,
}

impl Default for PeriodizationConfig {
    fn default() -> Self {
        Self {
            upper_body_increment: 5.0,
            lower_body_increment: 10.0,
            target_reps: 8,
            max_rpe: 8.0,
            deload_percentage: 0.10,
        }
    }
}

impl PeriodizationConfig {
    /// Increment appropriate for `exercise_name`
    pub fn increment_for(&self, exercise_name: &str) -> f64 {
        if is_lower_body_exercise(exercise_name) {
            self.lower_body_increment
        } else {
            self.upper_body_increment
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Maintain,
    Deload,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Increase => write!(f, "increase"),
            ChangeType::Maintain => write!(f, "maintain"),
            ChangeType::Deload => write!(f, "deload"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Suggested working weight for the next session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSuggestion {
    pub suggested_weight: f64,
    /// Signed difference from the last working weight
    pub change: f64,
    pub change_type: ChangeType,
    pub reason: String,
    pub confidence: Confidence,
}

impl fmt::Display for WeightSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:+}, {}, {} confidence): {}",
            self.suggested_weight, self.change, self.change_type, self.confidence, self.reason
        )
    }
}

/// Facts a progression rule is evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInput {
    pub reps: u32,
    pub target_reps: u32,
    pub rpe: f64,
    pub max_rpe: f64,
}

/// One entry of the ordered progression rule list
pub struct ProgressionRule {
    pub name: &'static str,
    pub change_type: ChangeType,
    pub applies: fn(&RuleInput) -> bool,
}

fn hit_target_with_reserve(input: &RuleInput) -> bool {
    input.reps >= input.target_reps && input.rpe <= input.max_rpe
}

fn missed_reps_or_max_effort(input: &RuleInput) -> bool {
    (input.reps as i64) < input.target_reps as i64 - 2 || input.rpe >= 10.0
}

fn always(_: &RuleInput) -> bool {
    true
}

/// Progression rules, first match wins. The last rule always applies.
pub static PROGRESSION_RULES: &[ProgressionRule] = &[
    ProgressionRule {
        name: "hit-target",
        change_type: ChangeType::Increase,
        applies: hit_target_with_reserve,
    },
    ProgressionRule {
        name: "missed-reps-or-max-effort",
        change_type: ChangeType::Deload,
        applies: missed_reps_or_max_effort,
    },
    ProgressionRule {
        name: "hold",
        change_type: ChangeType::Maintain,
        applies: always,
    },
];

/// First rule in [`PROGRESSION_RULES`] that applies to `input`
pub fn matching_rule(input: &RuleInput) -> &'static ProgressionRule {
    PROGRESSION_RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .unwrap_or(&PROGRESSION_RULES[PROGRESSION_RULES.len() - 1])
}

/// Whether `exercise_name` names a lower-body lift
pub fn is_lower_body_exercise(exercise_name: &str) -> bool {
    let name = exercise_name.to_lowercase();
    LOWER_BODY_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// Suggest the next working weight from the last completed set
pub fn calculate_weight_suggestion(
    last_set: &SetPerformance,
    target_reps: u32,
    exercise_name: &str,
    config: &PeriodizationConfig,
) -> WeightSuggestion {
    let rpe = last_set.rpe.unwrap_or(DEFAULT_RPE);
    let input = RuleInput {
        reps: last_set.reps,
        target_reps,
        rpe,
        max_rpe: config.max_rpe,
    };
    let rule = matching_rule(&input);

    debug!(
        exercise = exercise_name,
        weight = last_set.weight,
        reps = last_set.reps,
        rpe,
        target_reps,
        rule = rule.name,
        "progression rule selected"
    );

    match rule.change_type {
        ChangeType::Increase => {
            let increment = config.increment_for(exercise_name);
            WeightSuggestion {
                suggested_weight: last_set.weight + increment,
                change: increment,
                change_type: ChangeType::Increase,
                reason: format!(
                    "Hit {} reps at RPE {} - add {} next session",
                    last_set.reps, rpe, increment
                ),
                confidence: if rpe <= 7.0 {
                    Confidence::High
                } else {
                    Confidence::Medium
                },
            }
        }
        ChangeType::Deload => {
            let reduction = round_half_up(last_set.weight * config.deload_percentage);
            let percent = config.deload_percentage * 100.0;
            let reason = if rpe >= 10.0 {
                format!("Max effort reached - deload {:.0}% to recover", percent)
            } else {
                format!(
                    "Missed target reps ({}/{}) - deload {:.0}% and rebuild",
                    last_set.reps, target_reps, percent
                )
            };
            WeightSuggestion {
                suggested_weight: last_set.weight - reduction,
                change: -reduction,
                change_type: ChangeType::Deload,
                reason,
                confidence: Confidence::High,
            }
        }
        ChangeType::Maintain => WeightSuggestion {
            suggested_weight: last_set.weight,
            change: 0.0,
            change_type: ChangeType::Maintain,
            reason: format!(
                "Stay at this weight until you hit {} reps at RPE {} or lower",
                target_reps, config.max_rpe
            ),
            confidence: Confidence::Medium,
        },
    }
}

/// Suggest the next working weight from an exercise's logged history
///
/// Uses the most recent session of `exercise_name` (matched ignoring case).
/// Within it, the heaviest working set that reached the rep target is used;
/// if none did, the first working set is. Returns `None` when there is no
/// session or it holds only warm-up sets.
pub fn get_weight_from_history(
    history: &[ExerciseHistory],
    exercise_name: &str,
    target_reps: Option<u32>,
    config: &PeriodizationConfig,
) -> Option<WeightSuggestion> {
    let target_reps = target_reps.unwrap_or(config.target_reps);
    let wanted = exercise_name.trim().to_lowercase();

    let latest = history
        .iter()
        .filter(|entry| entry.exercise_name.trim().to_lowercase() == wanted)
        .reduce(|latest, entry| if entry.date > latest.date { entry } else { latest })?;

    let working: Vec<&SetPerformance> = latest.working_sets().collect();
    let first_working = *working.first()?;

    let best_set = working
        .iter()
        .copied()
        .filter(|set| set.reps >= target_reps)
        .reduce(|best, set| if set.weight > best.weight { set } else { best })
        .unwrap_or(first_working);

    Some(calculate_weight_suggestion(best_set, target_reps, exercise_name, config))
}
