use eduscreen_shared::domain::Score;

use super::Attempt;

/// Aggregate features over a set of graded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Features {
    pub accuracy: f64,
    pub skip_rate: f64,
    pub avg_time: f64,
    pub wrong: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Reduce attempts to their aggregate features. Empty input yields the
/// all-zero feature set; there is no division by zero to hit.
pub fn extract(rows: &[Attempt]) -> Features {
    let total = rows.len();
    if total == 0 {
        return Features::default();
    }

    let correct = rows.iter().filter(|a| a.score == Score::Correct).count();
    let wrong = rows.iter().filter(|a| a.score == Score::Incorrect).count();
    let skipped = rows.iter().filter(|a| a.score == Score::Skipped).count();
    let time_sum: i64 = rows
        .iter()
        .map(|a| i64::from(a.time_taken_seconds.unwrap_or(0)))
        .sum();

    Features {
        accuracy: correct as f64 / total as f64,
        skip_rate: skipped as f64 / total as f64,
        avg_time: time_sum as f64 / total as f64,
        wrong,
        skipped,
        total,
    }
}
