pub mod classify;
pub mod features;
pub mod grading;

use eduscreen_shared::domain::Score;

/// One graded attempt, as the feature extractor and classifiers see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub activity_id: i32,
    pub score: Score,
    pub time_taken_seconds: Option<i32>,
}
