// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'quizzes' table in the database.
/// Immutable once created; there is no edit path.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Free-form author label (e.g. an admin's email).
    pub created_by: Option<String>,

    /// Ordered question bank. Position is the identity answers are matched by.
    /// Stored as a JSON array in the database.
    pub questions: Json<Vec<Question>>,

    /// Always the sum of `questions[*].points`, fixed at creation.
    pub total_points: i32,

    /// Time limit in minutes.
    pub time_limit: i32,

    pub created_at: DateTime<Utc>,
}

/// A single multiple-choice question embedded in a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// 0-based index into `options`.
    pub correct_answer: i32,
    pub points: i32,
}

/// Listing row for quizzes. Questions are omitted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub question_count: i64,
    pub total_points: i32,
    pub time_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            created_by: quiz.created_by.clone(),
            question_count: quiz.questions.len() as i64,
            total_points: quiz.total_points,
            time_limit: quiz.time_limit,
            created_at: quiz.created_at,
        }
    }
}

/// DTO for sending a quiz to learners (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<PublicQuestion>,
    pub total_points: i32,
    pub time_limit: i32,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub points: i32,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz
                .questions
                .0
                .into_iter()
                .map(|q| PublicQuestion {
                    prompt: q.prompt,
                    options: q.options,
                    points: q.points,
                })
                .collect(),
            total_points: quiz.total_points,
            time_limit: quiz.time_limit,
        }
    }
}

/// A validated quiz ready to be persisted. Only the catalog builds these.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub questions: Vec<Question>,
    pub total_points: i32,
    pub time_limit: i32,
}

/// DTO for creating a new quiz.
/// Missing fields default to empty so the catalog reports them as validation errors.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)."))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub created_by: Option<String>,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
    /// Minutes; defaults to 30 when absent.
    #[validate(range(min = 1, max = 1440, message = "Time limit must be between 1 and 1440 minutes."))]
    pub time_limit: Option<i32>,
}

/// DTO for one question inside `CreateQuizRequest`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub prompt: String,
    #[serde(default)]
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    /// Checked against `options.len()` by the catalog.
    pub correct_answer: Option<i32>,
    /// Defaults to 1 when absent.
    #[validate(range(min = 1, max = 1000, message = "Points must be between 1 and 1000."))]
    pub points: Option<i32>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("too_few_options")
            .with_message("Each question needs at least two options.".into()));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
