// src/models/learner.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'learners' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Learner {
    pub id: i64,
    pub name: String,
    /// Unique across the roster.
    pub email: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A learner that has passed validation and is ready to be stored.
#[derive(Debug, Clone)]
pub struct NewLearner {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

/// DTO for enrolling a learner.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateLearnerRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(max = 100))]
    pub department: Option<String>,
}
