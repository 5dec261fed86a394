//! One-rep-max estimation and RPE-based load selection
//!
//! # Epley Formula
//!
//! ```text
//! 1RM = weight × (1 + reps / 30)
//! ```
//!
//! A single is taken at face value. The inverse gives the load expected to be
//! good for a given number of reps at a known 1RM.
//!
//! # RPE Chart
//!
//! Rate of perceived exertion ties reps and effort to a percentage of 1RM: a
//! set of 5 at RPE 8 (two reps left in the tank) is roughly 81% of max. The
//! chart below follows the widely used RTS values and is deliberately sparse;
//! a query for an unlisted rep count uses the nearest listed one.

use tracing::trace;

use crate::models::round_half_up;

/// One row of the RPE chart
#[derive(Debug, Clone, Copy)]
pub struct RpeRow {
    /// RPE in half-point steps (RPE 8.5 is stored as 17)
    pub half_steps: u32,
    /// (reps, percent of 1RM), ascending by reps
    pub percentages: &'static [(u32, f64)],
}

impl RpeRow {
    pub fn rpe(&self) -> f64 {
        self.half_steps as f64 / 2.0
    }
}

/// RPE 7.0 to 10.0 in half-point steps
pub static RPE_TABLE: &[RpeRow] = &[
    RpeRow {
        half_steps: 20,
        percentages: &[(1, 100.0), (2, 95.5), (3, 92.2), (4, 89.2), (5, 86.3), (6, 83.7), (8, 78.6), (10, 73.9)],
    },
    RpeRow {
        half_steps: 19,
        percentages: &[(1, 97.8), (2, 93.9), (3, 90.7), (4, 87.8), (5, 85.0), (6, 82.4), (8, 77.4), (10, 72.3)],
    },
    RpeRow {
        half_steps: 18,
        percentages: &[(1, 95.5), (2, 92.2), (3, 89.2), (4, 86.3), (5, 83.7), (6, 81.1), (8, 76.2), (10, 70.7)],
    },
    RpeRow {
        half_steps: 17,
        percentages: &[(1, 93.9), (2, 90.7), (3, 87.8), (4, 85.0), (5, 82.4), (6, 79.9), (8, 75.1), (10, 69.4)],
    },
    RpeRow {
        half_steps: 16,
        percentages: &[(1, 92.2), (2, 89.2), (3, 86.3), (4, 83.7), (5, 81.1), (6, 78.6), (8, 73.9), (10, 68.0)],
    },
    RpeRow {
        half_steps: 15,
        percentages: &[(1, 90.7), (3, 85.0), (5, 79.9), (8, 72.3), (10, 66.7)],
    },
    RpeRow {
        half_steps: 14,
        percentages: &[(1, 89.2), (3, 83.7), (5, 78.6), (8, 70.7), (10, 65.3)],
    },
];

/// Estimated one-rep max using the Epley formula
pub fn calculate_1rm(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    round_half_up(weight * (1.0 + reps as f64 / 30.0))
}

/// Load expected to be good for `target_reps` at the given 1RM
pub fn calculate_weight_for_reps(one_rm: f64, target_reps: u32) -> f64 {
    round_half_up(one_rm / (1.0 + target_reps as f64 / 30.0))
}

/// Estimated rep maxes for 1 through 10 reps
pub fn estimated_rep_maxes(one_rm: f64) -> Vec<(u32, f64)> {
    (1..=10)
        .map(|reps| {
            let weight = if reps == 1 {
                one_rm
            } else {
                calculate_weight_for_reps(one_rm, reps)
            };
            (reps, weight)
        })
        .collect()
}

/// Chart row for an exact RPE value, if the chart has one
pub fn rpe_row(rpe: f64) -> Option<&'static RpeRow> {
    let half_steps = rpe * 2.0;
    if half_steps.fract() != 0.0 || half_steps < 0.0 {
        return None;
    }
    let half_steps = half_steps as u32;
    RPE_TABLE.iter().find(|row| row.half_steps == half_steps)
}

/// Percentage of 1RM for `reps` at `rpe`
///
/// Returns `None` when the chart has no row for `rpe`. Otherwise the nearest
/// listed rep count is used; when two are equally near, the lower rep count
/// wins.
pub fn get_rpe_percentage(rpe: f64, reps: u32) -> Option<f64> {
    let row = rpe_row(rpe)?;
    let (matched_reps, percentage) = row
        .percentages
        .iter()
        .min_by_key(|(row_reps, _)| row_reps.abs_diff(reps))
        .copied()?;

    trace!(rpe, reps, matched_reps, percentage, "rpe chart lookup");
    Some(percentage)
}

/// Working weight for `target_reps` at `target_rpe` given a 1RM
pub fn get_weight_for_rpe(one_rm: f64, target_rpe: f64, target_reps: u32) -> Option<f64> {
    let percentage = get_rpe_percentage(target_rpe, target_reps)?;
    Some(round_half_up(one_rm * percentage / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_is_its_own_max() {
        assert_eq!(calculate_1rm(100.0, 1), 100.0);
        assert_eq!(calculate_1rm(142.5, 1), 142.5);
    }

    #[test]
    fn test_epley_estimate() {
        assert_eq!(calculate_1rm(100.0, 5), 117.0);
        assert_eq!(calculate_1rm(225.0, 10), 300.0);
        assert_eq!(calculate_1rm(135.0, 8), 171.0);
    }

    #[test]
    fn test_weight_for_reps_inverts_epley() {
        assert_eq!(calculate_weight_for_reps(300.0, 10), 225.0);
        assert_eq!(calculate_weight_for_reps(117.0, 5), 100.0);
    }

    #[test]
    fn test_estimated_rep_maxes() {
        let ladder = estimated_rep_maxes(300.0);
        assert_eq!(ladder.len(), 10);
        assert_eq!(ladder[0], (1, 300.0));
        assert_eq!(ladder[9], (10, 225.0));
        assert!(ladder.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_chart_shape() {
        assert_eq!(RPE_TABLE.len(), 7);
        for row in RPE_TABLE {
            assert!(row.rpe() >= 7.0 && row.rpe() <= 10.0);
            assert!(row.percentages.windows(2).all(|w| w[0].0 < w[1].0));
            assert!(row.percentages.windows(2).all(|w| w[0].1 > w[1].1));
        }
    }

    #[test]
    fn test_exact_lookup() {
        assert_eq!(get_rpe_percentage(10.0, 1), Some(100.0));
        assert_eq!(get_rpe_percentage(8.0, 5), Some(81.1));
        assert_eq!(get_rpe_percentage(8.5, 3), Some(87.8));
    }

    #[test]
    fn test_unknown_rpe_row() {
        assert_eq!(get_rpe_percentage(6.5, 5), None);
        assert_eq!(get_rpe_percentage(8.3, 5), None);
        assert_eq!(get_rpe_percentage(-1.0, 5), None);
        assert_eq!(get_rpe_percentage(f64::NAN, 5), None);
        assert_eq!(get_weight_for_rpe(200.0, 11.0, 5), None);
    }

    #[test]
    fn test_nearest_rep_count() {
        // Beyond the end of the row
        assert_eq!(get_rpe_percentage(10.0, 12), Some(73.9));
        // Sparse rows: 2 reps is equidistant from 1 and 3
        assert_eq!(get_rpe_percentage(7.0, 2), Some(89.2));
        assert_eq!(get_rpe_percentage(7.5, 7), Some(72.3));
    }

    #[test]
    fn test_tie_prefers_lower_rep_count() {
        // 7 reps sits between 6 and 8
        assert_eq!(get_rpe_percentage(8.0, 7), Some(78.6));
        // 9 reps sits between 8 and 10
        assert_eq!(get_rpe_percentage(9.0, 9), Some(76.2));
        // 4 reps sits between 3 and 5 in the sparse RPE 7 row
        assert_eq!(get_rpe_percentage(7.0, 4), Some(83.7));
    }

    #[test]
    fn test_weight_for_rpe() {
        // 200 * 0.811 = 162.2
        assert_eq!(get_weight_for_rpe(200.0, 8.0, 5), Some(162.0));
        assert_eq!(get_weight_for_rpe(300.0, 10.0, 1), Some(300.0));
    }
}
