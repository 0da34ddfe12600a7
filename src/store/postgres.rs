// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, types::Json};

use crate::{
    error::AppError,
    models::{
        assignment::{Assignment, NewAssignment, NewSubmission, Submission, SubmissionDetail},
        attempt::{Attempt, AttemptDetail, NewAttempt},
        faculty::{Faculty, NewFaculty},
        learner::{Learner, NewLearner},
        quiz::{NewQuiz, Quiz, QuizSummary},
    },
    store::{
        AssignmentRepository, AttemptPolicy, AttemptRepository, FacultyRoster, LearnerRoster,
        QuizRepository,
    },
};

const QUIZ_COLUMNS: &str =
    "id, title, description, created_by, questions, total_points, time_limit, created_at";

const ATTEMPT_COLUMNS: &str = "\
    id, learner_id, quiz_id, answers, total_score, percentage, \
    started_at, submitted_at, time_spent_secs";

const ATTEMPT_DETAIL_SELECT: &str = "
    SELECT
        a.id, a.learner_id, a.quiz_id, a.answers, a.total_score, a.percentage,
        a.started_at, a.submitted_at, a.time_spent_secs,
        q.title AS quiz_title,
        q.total_points AS quiz_total_points,
        q.time_limit AS quiz_time_limit,
        l.name AS learner_name,
        l.email AS learner_email
    FROM quiz_attempts a
    JOIN quizzes q ON q.id = a.quiz_id
    JOIN learners l ON l.id = a.learner_id";

const LEARNER_COLUMNS: &str = "id, name, email, department, created_at";

const FACULTY_COLUMNS: &str = "id, name, email, department, created_at";

const ASSIGNMENT_COLUMNS: &str = "id, title, description, deadline, created_by, created_at";

const SUBMISSION_DETAIL_SELECT: &str = "
    SELECT
        s.id, s.learner_id, s.assignment_id, s.content, s.status, s.submitted_at,
        a.title AS assignment_title,
        a.deadline AS assignment_deadline,
        l.name AS learner_name,
        l.email AS learner_email
    FROM submissions s
    JOIN assignments a ON a.id = s.assignment_id
    JOIN learners l ON l.id = s.learner_id";

/// Postgres-backed store. Queries are checked at runtime.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the migrations under `./migrations`.
    pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

/// Interprets constraint violations on writes; everything else is a storage failure.
fn map_write_error(err: sqlx::Error, conflict: &str, missing: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(missing.to_string());
        }
    }
    tracing::error!("Write failed: {:?}", err);
    AppError::from(err)
}

#[async_trait]
impl QuizRepository for PgStore {
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let stored = sqlx::query_as::<_, Quiz>(&format!(
            "INSERT INTO quizzes (title, description, created_by, questions, total_points, time_limit)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {QUIZ_COLUMNS}"
        ))
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.created_by)
        .bind(Json(&quiz.questions))
        .bind(quiz.total_points)
        .bind(quiz.time_limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz: {:?}", e);
            AppError::from(e)
        })?;

        Ok(stored)
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError> {
        let summaries = sqlx::query_as::<_, QuizSummary>(
            "SELECT
                id, title, description, created_by,
                jsonb_array_length(questions)::BIGINT AS question_count,
                total_points, time_limit, created_at
             FROM quizzes
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }
}

#[async_trait]
impl AttemptRepository for PgStore {
    async fn insert_attempt(
        &self,
        attempt: NewAttempt,
        policy: AttemptPolicy,
    ) -> Result<Attempt, AppError> {
        let mut tx = self.pool.begin().await?;

        // The claim row exists for every (learner, quiz) pair with an attempt,
        // whatever the policy, so switching policies later stays consistent.
        let claimed = sqlx::query(
            "INSERT INTO attempt_claims (learner_id, quiz_id)
             VALUES ($1, $2)
             ON CONFLICT (learner_id, quiz_id) DO NOTHING",
        )
        .bind(attempt.learner_id)
        .bind(attempt.quiz_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Attempt already recorded", "Quiz or learner not found"))?;

        if claimed.rows_affected() == 0 && policy == AttemptPolicy::SingleAttempt {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Quiz already attempted by this learner".to_string(),
            ));
        }

        let stored = sqlx::query_as::<_, Attempt>(&format!(
            "INSERT INTO quiz_attempts
                (learner_id, quiz_id, answers, total_score, percentage,
                 started_at, submitted_at, time_spent_secs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ATTEMPT_COLUMNS}"
        ))
        .bind(attempt.learner_id)
        .bind(attempt.quiz_id)
        .bind(Json(&attempt.answers))
        .bind(attempt.total_score)
        .bind(attempt.percentage)
        .bind(attempt.started_at)
        .bind(attempt.submitted_at)
        .bind(attempt.time_spent_secs)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Attempt already recorded", "Quiz or learner not found"))?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn attempts_for_learner(&self, learner_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        let attempts = sqlx::query_as::<_, AttemptDetail>(&format!(
            "{ATTEMPT_DETAIL_SELECT}
             WHERE a.learner_id = $1
             ORDER BY a.submitted_at DESC, a.id DESC"
        ))
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn attempts_for_quiz(&self, quiz_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        let attempts = sqlx::query_as::<_, AttemptDetail>(&format!(
            "{ATTEMPT_DETAIL_SELECT}
             WHERE a.quiz_id = $1
             ORDER BY a.submitted_at DESC, a.id DESC"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn all_attempts(&self) -> Result<Vec<AttemptDetail>, AppError> {
        let attempts = sqlx::query_as::<_, AttemptDetail>(&format!(
            "{ATTEMPT_DETAIL_SELECT}
             ORDER BY a.submitted_at DESC, a.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }
}

#[async_trait]
impl LearnerRoster for PgStore {
    async fn insert_learner(&self, learner: NewLearner) -> Result<Learner, AppError> {
        let conflict = format!("Email '{}' is already enrolled", learner.email);

        sqlx::query_as::<_, Learner>(&format!(
            "INSERT INTO learners (name, email, department)
             VALUES ($1, $2, $3)
             RETURNING {LEARNER_COLUMNS}"
        ))
        .bind(&learner.name)
        .bind(&learner.email)
        .bind(&learner.department)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &conflict, "Learner not found"))
    }

    async fn list_learners(&self) -> Result<Vec<Learner>, AppError> {
        let learners = sqlx::query_as::<_, Learner>(&format!(
            "SELECT {LEARNER_COLUMNS} FROM learners ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(learners)
    }

    async fn count_learners(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM learners")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_learner(&self, id: i64) -> Result<Option<Learner>, AppError> {
        let learner = sqlx::query_as::<_, Learner>(&format!(
            "SELECT {LEARNER_COLUMNS} FROM learners WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    async fn delete_learner(&self, id: i64) -> Result<bool, AppError> {
        // Attempts, claims and submissions go with the learner (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete learner: {:?}", e);
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FacultyRoster for PgStore {
    async fn insert_faculty(&self, faculty: NewFaculty) -> Result<Faculty, AppError> {
        let conflict = format!("Faculty '{}' is already registered", faculty.email);

        sqlx::query_as::<_, Faculty>(&format!(
            "INSERT INTO faculty (name, email, department)
             VALUES ($1, $2, $3)
             RETURNING {FACULTY_COLUMNS}"
        ))
        .bind(&faculty.name)
        .bind(&faculty.email)
        .bind(&faculty.department)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &conflict, "Faculty not found"))
    }

    async fn list_faculty(&self) -> Result<Vec<Faculty>, AppError> {
        let faculty = sqlx::query_as::<_, Faculty>(&format!(
            "SELECT {FACULTY_COLUMNS} FROM faculty ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(faculty)
    }

    async fn find_faculty_by_email(&self, email: &str) -> Result<Option<Faculty>, AppError> {
        let faculty = sqlx::query_as::<_, Faculty>(&format!(
            "SELECT {FACULTY_COLUMNS} FROM faculty WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(faculty)
    }

    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM faculty WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError> {
        let stored = sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments (title, description, deadline, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(&assignment.title)
        .bind(&assignment.description)
        .bind(assignment.deadline)
        .bind(&assignment.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert assignment: {:?}", e);
            AppError::from(e)
        })?;

        Ok(stored)
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY deadline, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn find_assignment(&self, id: i64) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS}
             FROM assignments
             WHERE deadline >= $1 AND deadline <= $2
             ORDER BY deadline, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (learner_id, assignment_id, content)
             VALUES ($1, $2, $3)
             RETURNING id, learner_id, assignment_id, content, status, submitted_at",
        )
        .bind(submission.learner_id)
        .bind(submission.assignment_id)
        .bind(&submission.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Assignment already submitted by this learner",
                "Assignment or learner not found",
            )
        })
    }

    async fn submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        let submissions = sqlx::query_as::<_, SubmissionDetail>(&format!(
            "{SUBMISSION_DETAIL_SELECT}
             WHERE s.assignment_id = $1
             ORDER BY s.submitted_at DESC, s.id DESC"
        ))
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn submissions_for_learner(
        &self,
        learner_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        let submissions = sqlx::query_as::<_, SubmissionDetail>(&format!(
            "{SUBMISSION_DETAIL_SELECT}
             WHERE s.learner_id = $1
             ORDER BY s.submitted_at DESC, s.id DESC"
        ))
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }
}
