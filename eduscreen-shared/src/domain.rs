use std::fmt;

use serde::{Deserialize, Serialize};

/// Ternary outcome of a graded attempt.
///
/// Stored as an integer (`1` / `-1` / `0`); a skipped activity is a valid
/// outcome, not an error, and must never be conflated with a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    Correct,
    Incorrect,
    Skipped,
}

impl Score {
    pub fn as_i32(self) -> i32 {
        match self {
            Score::Correct => 1,
            Score::Incorrect => -1,
            Score::Skipped => 0,
        }
    }

    pub fn is_correct(self) -> bool {
        self == Score::Correct
    }
}

impl TryFrom<i32> for Score {
    type Error = InvalidScore;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Score::Correct),
            -1 => Ok(Score::Incorrect),
            0 => Ok(Score::Skipped),
            other => Err(InvalidScore(other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("score out of range: {0}")]
pub struct InvalidScore(pub i32);

/// Dyscalculia screening outcome. The wire representation is the
/// human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DyscalculiaRisk {
    #[serde(rename = "Not Enough Data")]
    NotEnoughData,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Mild Risk")]
    MildRisk,
    #[serde(rename = "No Risk")]
    NoRisk,
}

impl DyscalculiaRisk {
    pub fn as_str(self) -> &'static str {
        match self {
            DyscalculiaRisk::NotEnoughData => "Not Enough Data",
            DyscalculiaRisk::HighRisk => "High Risk",
            DyscalculiaRisk::MildRisk => "Mild Risk",
            DyscalculiaRisk::NoRisk => "No Risk",
        }
    }
}

impl fmt::Display for DyscalculiaRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttentionStatus {
    #[serde(rename = "Not Enough Data")]
    NotEnoughData,
    #[serde(rename = "Attention Impairment")]
    Impairment,
    #[serde(rename = "No Attention Impairment")]
    NoImpairment,
}

impl AttentionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttentionStatus::NotEnoughData => "Not Enough Data",
            AttentionStatus::Impairment => "Attention Impairment",
            AttentionStatus::NoImpairment => "No Attention Impairment",
        }
    }
}

impl fmt::Display for AttentionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryStatus {
    #[serde(rename = "Not Enough Data")]
    NotEnoughData,
    #[serde(rename = "Memory Impairment")]
    Impairment,
    #[serde(rename = "No Memory Impairment")]
    NoImpairment,
}

impl MemoryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryStatus::NotEnoughData => "Not Enough Data",
            MemoryStatus::Impairment => "Memory Impairment",
            MemoryStatus::NoImpairment => "No Memory Impairment",
        }
    }
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
