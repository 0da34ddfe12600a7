// src/handlers/quiz.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{attempt::SubmitAttemptRequest, quiz::PublicQuiz},
    services::{attempts::AttemptLog, catalog::QuizCatalog},
};

/// Lists all quizzes (metadata only, questions omitted).
pub async fn list_quizzes(
    State(catalog): State<QuizCatalog>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = catalog.list_quizzes().await?;

    Ok(Json(quizzes))
}

/// Retrieves a quiz for a learner to take.
/// The answer key is stripped via `PublicQuiz`.
pub async fn get_quiz(
    State(catalog): State<QuizCatalog>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog.get_quiz(id).await?;

    Ok(Json(PublicQuiz::from(quiz)))
}

/// Submits a learner's answers for grading.
///
/// * Answers are matched to questions by position.
/// * The graded attempt is stored before the response is sent.
/// * Returns 201 Created with the score breakdown.
pub async fn submit_attempt(
    State(log): State<AttemptLog>,
    AppPath(quiz_id): AppPath<i64>,
    AppJson(req): AppJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = log.submit(quiz_id, req).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Retrieves a single stored attempt.
pub async fn get_attempt(
    State(log): State<AttemptLog>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = log.get_attempt(id).await?;

    Ok(Json(attempt))
}

/// Lists a learner's attempts joined with quiz metadata, newest first.
pub async fn learner_attempts(
    State(log): State<AttemptLog>,
    AppPath(learner_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = log.attempts_for_learner(learner_id).await?;

    Ok(Json(attempts))
}
