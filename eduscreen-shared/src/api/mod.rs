use serde::{Deserialize, Serialize};

use crate::domain::{AttentionStatus, DyscalculiaRisk, MemoryStatus};

pub mod endpoints;
#[cfg(feature = "rest-client")]
pub mod rest;

// Signup/login. Fields are optional so that a missing field surfaces as a
// 400 validation error rather than a body-decoding failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupReq {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginReq {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Children
#[derive(Debug, Serialize, Deserialize)]
pub struct AddChildReq {
    pub email: String,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub grade: i32,
}

// Activity submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveActivityReq {
    pub child_name: String,
    pub activity_id: i32,
    pub given_answer: Option<String>,
    #[serde(default)]
    pub time_taken_seconds: Option<i32>,
}

// Report
#[derive(Debug, Serialize, Deserialize)]
pub struct ChildProfileDto {
    pub child_id: i32,
    pub child_name: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityRowDto {
    pub activity_id: i32,
    pub given_answer: Option<String>,
    pub is_correct: i32,
    pub score: i32,
    pub time_taken_seconds: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResp {
    pub child: ChildProfileDto,
    pub activities: Vec<ActivityRowDto>,
    pub dyscalculia_risk: DyscalculiaRisk,
    pub attention_status: AttentionStatus,
    pub memory_status: MemoryStatus,
}

// Generic bodies
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResp {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResp {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}
