// src/store/mod.rs

//! Persistence seams.
//!
//! Every component receives the repositories it needs at construction time.
//! `PgStore` backs production; `MemoryStore` backs local runs without a
//! database and the test suite. Both implementations share the same
//! semantics, including how the single-attempt policy is enforced.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        assignment::{Assignment, NewAssignment, NewSubmission, Submission, SubmissionDetail},
        attempt::{Attempt, AttemptDetail, NewAttempt},
        faculty::{Faculty, NewFaculty},
        learner::{Learner, NewLearner},
        quiz::{NewQuiz, Quiz, QuizSummary},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Whether a learner may hold more than one attempt per quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPolicy {
    AllowRetakes,
    SingleAttempt,
}

impl AttemptPolicy {
    pub fn from_flag(allow_retakes: bool) -> Self {
        if allow_retakes {
            AttemptPolicy::AllowRetakes
        } else {
            AttemptPolicy::SingleAttempt
        }
    }
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError>;

    /// Newest first.
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError>;

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError>;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Appends an attempt. Under `SingleAttempt` the check and the insert are
    /// one atomic step and a second attempt yields `AppError::Conflict`.
    async fn insert_attempt(
        &self,
        attempt: NewAttempt,
        policy: AttemptPolicy,
    ) -> Result<Attempt, AppError>;

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError>;

    async fn attempts_for_learner(&self, learner_id: i64) -> Result<Vec<AttemptDetail>, AppError>;

    async fn attempts_for_quiz(&self, quiz_id: i64) -> Result<Vec<AttemptDetail>, AppError>;

    /// Ordered by submission time, newest first.
    async fn all_attempts(&self) -> Result<Vec<AttemptDetail>, AppError>;
}

/// The learner roster collaborator.
#[async_trait]
pub trait LearnerRoster: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already enrolled.
    async fn insert_learner(&self, learner: NewLearner) -> Result<Learner, AppError>;

    async fn list_learners(&self) -> Result<Vec<Learner>, AppError>;

    async fn count_learners(&self) -> Result<i64, AppError>;

    async fn find_learner(&self, id: i64) -> Result<Option<Learner>, AppError>;

    /// Removes the learner with their attempts and submissions.
    /// Returns `false` when no such learner existed.
    async fn delete_learner(&self, id: i64) -> Result<bool, AppError>;
}

/// Faculty accounts. Assignments name their author by faculty email.
#[async_trait]
pub trait FacultyRoster: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn insert_faculty(&self, faculty: NewFaculty) -> Result<Faculty, AppError>;

    async fn list_faculty(&self) -> Result<Vec<Faculty>, AppError>;

    async fn find_faculty_by_email(&self, email: &str) -> Result<Option<Faculty>, AppError>;

    /// Returns `false` when no such faculty member existed.
    /// Assignments they posted are kept.
    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError>;

    /// Ordered by deadline, earliest first.
    async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError>;

    async fn find_assignment(&self, id: i64) -> Result<Option<Assignment>, AppError>;

    /// Deadlines within `[from, to]`, earliest first.
    async fn assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>, AppError>;

    /// Fails with `AppError::Conflict` when the learner already submitted.
    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, AppError>;

    async fn submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError>;

    async fn submissions_for_learner(
        &self,
        learner_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError>;
}

/// Handles to every repository, shared by all components.
#[derive(Clone)]
pub struct Store {
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub learners: Arc<dyn LearnerRoster>,
    pub faculty: Arc<dyn FacultyRoster>,
    pub assignments: Arc<dyn AssignmentRepository>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::default()))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: QuizRepository
            + AttemptRepository
            + LearnerRoster
            + FacultyRoster
            + AssignmentRepository
            + 'static,
    {
        Self {
            quizzes: backend.clone(),
            attempts: backend.clone(),
            learners: backend.clone(),
            faculty: backend.clone(),
            assignments: backend,
        }
    }
}
