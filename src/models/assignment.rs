// src/models/assignment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::learner::Learner;

/// Represents the 'assignments' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub created_by: String,
}

/// DTO for posting an assignment. Every field is required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Description is required."))]
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Author is required."))]
    pub created_by: String,
}

/// Represents the 'submissions' table in the database.
/// At most one row per (learner, assignment).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub learner_id: i64,
    pub assignment_id: i64,
    pub content: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub learner_id: i64,
    pub assignment_id: i64,
    pub content: String,
}

/// DTO for submitting an assignment.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    pub learner_id: Option<i64>,
    #[validate(length(max = 20000))]
    pub content: Option<String>,
}

/// A submission joined with assignment metadata and learner identity.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SubmissionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub assignment_deadline: DateTime<Utc>,
    pub learner_name: String,
    pub learner_email: String,
}

/// Submission statistics for one assignment.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub total_learners: i64,
    pub submitted_count: i64,
    pub not_submitted_count: i64,
    /// Percent of the roster that submitted, rounded to 2 decimals.
    pub submission_rate: f64,
    pub submissions: Vec<SubmissionDetail>,
    pub not_submitted: Vec<Learner>,
}

/// One learner who still owes an assignment that is due soon.
/// Handed to whatever delivers the reminder; delivery itself is not modelled here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderNotice {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub deadline: DateTime<Utc>,
    pub learner_id: i64,
    pub learner_name: String,
    pub learner_email: String,
}
