// src/handlers/assignment.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::assignment::SubmitAssignmentRequest,
    services::coursework::Coursework,
};

/// Lists all assignments, earliest deadline first.
pub async fn list_assignments(
    State(coursework): State<Coursework>,
) -> Result<impl IntoResponse, AppError> {
    let assignments = coursework.list_assignments().await?;

    Ok(Json(assignments))
}

/// Submits an assignment on behalf of a learner.
/// Rejects a second submission for the same assignment with 409 Conflict.
pub async fn submit_assignment(
    State(coursework): State<Coursework>,
    AppPath(assignment_id): AppPath<i64>,
    AppJson(req): AppJson<SubmitAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = coursework.submit(assignment_id, req).await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Lists a learner's submissions joined with assignment metadata.
pub async fn learner_submissions(
    State(coursework): State<Coursework>,
    AppPath(learner_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = coursework.submissions_for_learner(learner_id).await?;

    Ok(Json(submissions))
}
