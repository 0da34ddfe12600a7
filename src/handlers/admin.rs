// src/handlers/admin.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{
        assignment::CreateAssignmentRequest, faculty::CreateFacultyRequest,
        learner::CreateLearnerRequest, quiz::CreateQuizRequest,
    },
    services::{
        analytics::Analytics, attempts::AttemptLog, catalog::QuizCatalog, coursework::Coursework,
        faculty::FacultyDirectory, roster::Roster,
    },
};

/// Creates a new quiz.
/// Total points are derived from the questions; returns 201 Created with the stored quiz.
pub async fn create_quiz(
    State(catalog): State<QuizCatalog>,
    AppJson(payload): AppJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog.create_quiz(payload).await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Retrieves a quiz including its answer key.
pub async fn get_quiz(
    State(catalog): State<QuizCatalog>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog.get_quiz(id).await?;

    Ok(Json(quiz))
}

/// Participation and score statistics for a quiz.
pub async fn quiz_analytics(
    State(analytics): State<Analytics>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let report = analytics.compute_analytics(id).await?;

    Ok(Json(report))
}

/// Attempts recorded for one quiz, newest first.
pub async fn quiz_attempts(
    State(log): State<AttemptLog>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = log.attempts_for_quiz(id).await?;

    Ok(Json(attempts))
}

/// Lists every attempt joined with learner and quiz metadata, newest first.
pub async fn list_attempts(State(log): State<AttemptLog>) -> Result<impl IntoResponse, AppError> {
    let attempts = log.all_attempts().await?;

    Ok(Json(attempts))
}

pub async fn list_learners(State(roster): State<Roster>) -> Result<impl IntoResponse, AppError> {
    let learners = roster.list().await?;

    Ok(Json(learners))
}

pub async fn get_learner(
    State(roster): State<Roster>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner = roster.get(id).await?;

    Ok(Json(learner))
}

/// Enrolls a learner. Emails are unique (409 Conflict otherwise).
pub async fn create_learner(
    State(roster): State<Roster>,
    AppJson(payload): AppJson<CreateLearnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let learner = roster.enroll(payload).await?;

    Ok((StatusCode::CREATED, Json(learner)))
}

/// Removes a learner together with their attempts and submissions.
pub async fn delete_learner(
    State(roster): State<Roster>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    roster.remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_faculty(
    State(directory): State<FacultyDirectory>,
) -> Result<impl IntoResponse, AppError> {
    let faculty = directory.list().await?;

    Ok(Json(faculty))
}

/// Adds a faculty member. Emails are unique (409 Conflict otherwise).
pub async fn create_faculty(
    State(directory): State<FacultyDirectory>,
    AppJson(payload): AppJson<CreateFacultyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let faculty = directory.add(payload).await?;

    Ok((StatusCode::CREATED, Json(faculty)))
}

/// Removes a faculty member. Assignments they posted stay.
pub async fn delete_faculty(
    State(directory): State<FacultyDirectory>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    directory.remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Posts an assignment. `created_by` must be a registered faculty email.
pub async fn create_assignment(
    State(coursework): State<Coursework>,
    AppJson(payload): AppJson<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = coursework.create_assignment(payload).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Lists submissions for an assignment joined with learner identity.
pub async fn assignment_submissions(
    State(coursework): State<Coursework>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = coursework.submissions_for_assignment(id).await?;

    Ok(Json(submissions))
}

pub async fn assignment_stats(
    State(coursework): State<Coursework>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let stats = coursework.assignment_stats(id).await?;

    Ok(Json(stats))
}

/// Learners who still owe an assignment due within the reminder window.
/// Sending the reminders is left to the mail collaborator.
pub async fn pending_reminders(
    State(coursework): State<Coursework>,
) -> Result<impl IntoResponse, AppError> {
    let notices = coursework.pending_reminders(Utc::now()).await?;

    Ok(Json(notices))
}
