// src/models/faculty.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'faculty' table in the database.
/// Faculty members post assignments; their email is the author label.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    /// Unique across faculty, stored lowercase.
    pub email: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFaculty {
    pub name: String,
    pub email: String,
    pub department: String,
}

/// DTO for adding a faculty member. Every field is required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateFacultyRequest {
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
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Department is required."))]
    pub department: String,
}
