use eduscreen_shared::domain::{AttentionStatus, DyscalculiaRisk, MemoryStatus, Score};

use super::{Attempt, features};

/// Inclusive activity-id ranges feeding each classifier.
pub const DYSCALCULIA_IDS: (i32, i32) = (1, 9);
pub const ATTENTION_IDS: (i32, i32) = (10, 11);
pub const MEMORY_IDS: (i32, i32) = (12, 13);

/// Keep only attempts whose activity id falls inside the inclusive range.
pub fn in_id_range(rows: &[Attempt], (lo, hi): (i32, i32)) -> Vec<Attempt> {
    rows.iter()
        .copied()
        .filter(|a| lo <= a.activity_id && a.activity_id <= hi)
        .collect()
}

/// Threshold cascade over the extracted features; the first matching rule
/// wins. The confidence is a fixed constant per bucket, not a model output.
pub fn classify_dyscalculia(rows: &[Attempt]) -> (Option<f64>, DyscalculiaRisk) {
    if rows.is_empty() {
        return (None, DyscalculiaRisk::NotEnoughData);
    }

    let f = features::extract(rows);
    let wrong_skipped_ratio = (f.wrong + f.skipped) as f64 / f.total as f64;

    if f.accuracy < 0.4 || wrong_skipped_ratio >= 0.5 || f.skip_rate >= 0.3 || f.avg_time >= 8.0 {
        return (Some(0.85), DyscalculiaRisk::HighRisk);
    }
    if f.accuracy < 0.7 || f.skip_rate >= 0.15 || f.avg_time >= 5.0 {
        return (Some(0.55), DyscalculiaRisk::MildRisk);
    }
    (Some(0.15), DyscalculiaRisk::NoRisk)
}

/// Attention and memory share one rule: with at least two attempts, a
/// single imperfect score flags impairment. Deliberately strict.
fn any_imperfect(rows: &[Attempt]) -> Option<bool> {
    if rows.len() < 2 {
        return None;
    }
    Some(rows.iter().any(|a| a.score != Score::Correct))
}

pub fn classify_attention(rows: &[Attempt]) -> AttentionStatus {
    match any_imperfect(rows) {
        None => AttentionStatus::NotEnoughData,
        Some(true) => AttentionStatus::Impairment,
        Some(false) => AttentionStatus::NoImpairment,
    }
}

pub fn classify_memory(rows: &[Attempt]) -> MemoryStatus {
    match any_imperfect(rows) {
        None => MemoryStatus::NotEnoughData,
        Some(true) => MemoryStatus::Impairment,
        Some(false) => MemoryStatus::NoImpairment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(activity_id: i32, score: Score, time: Option<i32>) -> Attempt {
        Attempt {
            activity_id,
            score,
            time_taken_seconds: time,
        }
    }

    fn repeated(n: usize, score: Score) -> Vec<Attempt> {
        (0..n).map(|_| attempt(1, score, None)).collect()
    }

    #[test]
    fn dyscalculia_needs_data() {
        assert_eq!(
            classify_dyscalculia(&[]),
            (None, DyscalculiaRisk::NotEnoughData)
        );
    }

    #[test]
    fn dyscalculia_low_accuracy_is_high_risk() {
        let mut rows = repeated(3, Score::Correct);
        rows.extend(repeated(7, Score::Incorrect));
        assert_eq!(
            classify_dyscalculia(&rows),
            (Some(0.85), DyscalculiaRisk::HighRisk)
        );
    }

    #[test]
    fn dyscalculia_clean_run_is_no_risk() {
        let mut rows = repeated(8, Score::Correct);
        rows.extend(repeated(2, Score::Incorrect));
        assert_eq!(
            classify_dyscalculia(&rows),
            (Some(0.15), DyscalculiaRisk::NoRisk)
        );
    }

    #[test]
    fn dyscalculia_slow_answers_are_mild_risk() {
        // Perfect accuracy but avg_time in [5, 8).
        let rows: Vec<Attempt> = (0..4).map(|_| attempt(1, Score::Correct, Some(6))).collect();
        assert_eq!(
            classify_dyscalculia(&rows),
            (Some(0.55), DyscalculiaRisk::MildRisk)
        );
    }

    #[test]
    fn dyscalculia_avg_time_boundary_is_high_risk() {
        let rows: Vec<Attempt> = (0..4).map(|_| attempt(1, Score::Correct, Some(8))).collect();
        assert_eq!(
            classify_dyscalculia(&rows),
            (Some(0.85), DyscalculiaRisk::HighRisk)
        );
    }

    #[test]
    fn dyscalculia_skips_count_against() {
        // 1 skip in 3 rows: skip_rate 0.33 >= 0.3.
        let rows = [
            attempt(1, Score::Correct, Some(1)),
            attempt(2, Score::Correct, Some(1)),
            attempt(3, Score::Skipped, None),
        ];
        assert_eq!(
            classify_dyscalculia(&rows),
            (Some(0.85), DyscalculiaRisk::HighRisk)
        );
    }

    #[test]
    fn attention_needs_two_rows() {
        assert_eq!(classify_attention(&[]), AttentionStatus::NotEnoughData);
        assert_eq!(
            classify_attention(&repeated(1, Score::Correct)),
            AttentionStatus::NotEnoughData
        );
    }

    #[test]
    fn attention_flags_any_imperfect_row() {
        let rows = [
            attempt(10, Score::Correct, None),
            attempt(11, Score::Skipped, None),
        ];
        assert_eq!(classify_attention(&rows), AttentionStatus::Impairment);
        assert_eq!(
            classify_attention(&repeated(2, Score::Correct)),
            AttentionStatus::NoImpairment
        );
    }

    #[test]
    fn memory_mirrors_attention_rule() {
        assert_eq!(
            classify_memory(&repeated(1, Score::Correct)),
            MemoryStatus::NotEnoughData
        );
        let rows = [
            attempt(12, Score::Correct, None),
            attempt(13, Score::Incorrect, None),
        ];
        assert_eq!(classify_memory(&rows), MemoryStatus::Impairment);
        assert_eq!(
            classify_memory(&repeated(2, Score::Correct)),
            MemoryStatus::NoImpairment
        );
    }

    #[test]
    fn range_partition_is_inclusive() {
        let rows = [
            attempt(1, Score::Correct, None),
            attempt(9, Score::Correct, None),
            attempt(10, Score::Correct, None),
            attempt(11, Score::Correct, None),
            attempt(12, Score::Correct, None),
        ];
        assert_eq!(in_id_range(&rows, DYSCALCULIA_IDS).len(), 2);
        assert_eq!(in_id_range(&rows, ATTENTION_IDS).len(), 2);
        assert_eq!(in_id_range(&rows, MEMORY_IDS).len(), 1);
    }
}
