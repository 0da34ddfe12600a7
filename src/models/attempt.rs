// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// Per-question outcome of comparing a submitted option to the answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question_index: usize,
    /// As submitted; may not reference a real option.
    pub selected_option: i64,
    pub is_correct: bool,
    pub points_earned: i32,
}

/// Represents the 'quiz_attempts' table in the database.
/// Created once per successful submission, never mutated.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub learner_id: i64,
    pub quiz_id: i64,
    pub answers: Json<Vec<GradedAnswer>>,
    pub total_score: i32,
    /// Derived from `total_score`, rounded to 2 decimals.
    pub percentage: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_secs: Option<i64>,
}

/// A graded attempt that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub learner_id: i64,
    pub quiz_id: i64,
    pub answers: Vec<GradedAnswer>,
    pub total_score: i32,
    pub percentage: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_secs: Option<i64>,
}

/// An attempt joined with quiz metadata and learner identity.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttemptDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attempt: Attempt,
    pub quiz_title: String,
    pub quiz_total_points: i32,
    pub quiz_time_limit: i32,
    pub learner_name: String,
    pub learner_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub selected_option: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAttemptRequest {
    /// Stable learner identifier supplied by the session collaborator.
    pub learner_id: Option<i64>,
    /// Matched to the quiz's questions by position.
    pub answers: Option<Vec<SubmittedAnswer>>,
    /// When the learner opened the quiz, if the client tracked it.
    pub started_at: Option<DateTime<Utc>>,
}

/// Graded result returned to the learner right after submission.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub learner_id: i64,
    pub score: i32,
    pub total_points: i32,
    pub percentage: f64,
    pub answers: Vec<GradedAnswer>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_secs: Option<i64>,
}
