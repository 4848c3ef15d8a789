use crate::storage::schema::{activity_results, child, responsible_adult};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use eduscreen_shared::domain::{InvalidScore, Score};

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = responsible_adult)]
#[diesel(primary_key(adult_id))]
pub struct Adult {
    pub adult_id: i32,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub failed_attempts: i32,
    pub lock_until: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = responsible_adult)]
pub struct NewAdult<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = child)]
#[diesel(primary_key(child_id))]
#[diesel(belongs_to(Adult, foreign_key = adult_id))]
pub struct Child {
    pub child_id: i32,
    pub adult_id: i32,
    pub child_name: String,
    pub gender: String,
    pub age: i32,
    pub grade: i32,
}

#[derive(Insertable)]
#[diesel(table_name = child)]
pub struct NewChild<'a> {
    pub adult_id: i32,
    pub child_name: &'a str,
    pub gender: &'a str,
    pub age: i32,
    pub grade: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = activity_results)]
#[diesel(primary_key(result_id))]
#[diesel(belongs_to(Child, foreign_key = child_id))]
pub struct ActivityResult {
    pub result_id: i32,
    pub child_id: i32,
    pub activity_id: i32,
    pub given_answer: Option<String>,
    pub is_correct: i32,
    pub score: i32,
    pub is_completed: i32,
    pub time_taken_seconds: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = activity_results)]
pub struct NewActivityResult<'a> {
    pub child_id: i32,
    pub activity_id: i32,
    pub given_answer: Option<&'a str>,
    pub is_correct: i32,
    pub score: i32,
    pub is_completed: i32,
    pub time_taken_seconds: Option<i32>,
}

impl TryFrom<&ActivityResult> for crate::screening::Attempt {
    type Error = InvalidScore;

    fn try_from(row: &ActivityResult) -> Result<Self, Self::Error> {
        Ok(Self {
            activity_id: row.activity_id,
            score: Score::try_from(row.score)?,
            time_taken_seconds: row.time_taken_seconds,
        })
    }
}
