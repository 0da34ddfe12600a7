// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;

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

/// Process-local store. Every write takes the single write lock, so
/// check-then-insert sequences are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    quizzes: BTreeMap<i64, Quiz>,
    attempts: BTreeMap<i64, Attempt>,
    learners: BTreeMap<i64, Learner>,
    faculty: BTreeMap<i64, Faculty>,
    assignments: BTreeMap<i64, Assignment>,
    submissions: BTreeMap<i64, Submission>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn attempt_detail(&self, attempt: &Attempt) -> Option<AttemptDetail> {
        let quiz = self.quizzes.get(&attempt.quiz_id)?;
        let learner = self.learners.get(&attempt.learner_id)?;
        Some(AttemptDetail {
            attempt: attempt.clone(),
            quiz_title: quiz.title.clone(),
            quiz_total_points: quiz.total_points,
            quiz_time_limit: quiz.time_limit,
            learner_name: learner.name.clone(),
            learner_email: learner.email.clone(),
        })
    }

    fn attempt_details<F>(&self, keep: F) -> Vec<AttemptDetail>
    where
        F: Fn(&Attempt) -> bool,
    {
        let mut details: Vec<AttemptDetail> = self
            .attempts
            .values()
            .filter(|a| keep(*a))
            .filter_map(|a| self.attempt_detail(a))
            .collect();
        details.sort_by(|a, b| {
            (b.attempt.submitted_at, b.attempt.id).cmp(&(a.attempt.submitted_at, a.attempt.id))
        });
        details
    }

    fn submission_details<F>(&self, keep: F) -> Vec<SubmissionDetail>
    where
        F: Fn(&Submission) -> bool,
    {
        let mut details: Vec<SubmissionDetail> = self
            .submissions
            .values()
            .filter(|s| keep(*s))
            .filter_map(|s| {
                let assignment = self.assignments.get(&s.assignment_id)?;
                let learner = self.learners.get(&s.learner_id)?;
                Some(SubmissionDetail {
                    submission: s.clone(),
                    assignment_title: assignment.title.clone(),
                    assignment_deadline: assignment.deadline,
                    learner_name: learner.name.clone(),
                    learner_email: learner.email.clone(),
                })
            })
            .collect();
        details.sort_by(|a, b| {
            (b.submission.submitted_at, b.submission.id)
                .cmp(&(a.submission.submitted_at, a.submission.id))
        });
        details
    }
}

#[async_trait]
impl QuizRepository for MemoryStore {
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let stored = Quiz {
            id,
            title: quiz.title,
            description: quiz.description,
            created_by: quiz.created_by,
            questions: Json(quiz.questions),
            total_points: quiz.total_points,
            time_limit: quiz.time_limit,
            created_at: Utc::now(),
        };
        tables.quizzes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError> {
        let tables = self.tables.read().await;
        let mut summaries: Vec<QuizSummary> = tables.quizzes.values().map(QuizSummary::from).collect();
        summaries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(summaries)
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        Ok(self.tables.read().await.quizzes.get(&id).cloned())
    }
}

#[async_trait]
impl AttemptRepository for MemoryStore {
    async fn insert_attempt(
        &self,
        attempt: NewAttempt,
        policy: AttemptPolicy,
    ) -> Result<Attempt, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.quizzes.contains_key(&attempt.quiz_id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }
        if !tables.learners.contains_key(&attempt.learner_id) {
            return Err(AppError::NotFound("Learner not found".to_string()));
        }

        if policy == AttemptPolicy::SingleAttempt
            && tables
                .attempts
                .values()
                .any(|a| a.learner_id == attempt.learner_id && a.quiz_id == attempt.quiz_id)
        {
            return Err(AppError::Conflict(
                "Quiz already attempted by this learner".to_string(),
            ));
        }

        let id = tables.next_id();
        let stored = Attempt {
            id,
            learner_id: attempt.learner_id,
            quiz_id: attempt.quiz_id,
            answers: Json(attempt.answers),
            total_score: attempt.total_score,
            percentage: attempt.percentage,
            started_at: attempt.started_at,
            submitted_at: attempt.submitted_at,
            time_spent_secs: attempt.time_spent_secs,
        };
        tables.attempts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        Ok(self.tables.read().await.attempts.get(&id).cloned())
    }

    async fn attempts_for_learner(&self, learner_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.attempt_details(|a| a.learner_id == learner_id))
    }

    async fn attempts_for_quiz(&self, quiz_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.attempt_details(|a| a.quiz_id == quiz_id))
    }

    async fn all_attempts(&self) -> Result<Vec<AttemptDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.attempt_details(|_| true))
    }
}

#[async_trait]
impl LearnerRoster for MemoryStore {
    async fn insert_learner(&self, learner: NewLearner) -> Result<Learner, AppError> {
        let mut tables = self.tables.write().await;

        if tables.learners.values().any(|l| l.email == learner.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already enrolled",
                learner.email
            )));
        }

        let id = tables.next_id();
        let stored = Learner {
            id,
            name: learner.name,
            email: learner.email,
            department: learner.department,
            created_at: Utc::now(),
        };
        tables.learners.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_learners(&self) -> Result<Vec<Learner>, AppError> {
        Ok(self.tables.read().await.learners.values().cloned().collect())
    }

    async fn count_learners(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().await.learners.len() as i64)
    }

    async fn find_learner(&self, id: i64) -> Result<Option<Learner>, AppError> {
        Ok(self.tables.read().await.learners.get(&id).cloned())
    }

    async fn delete_learner(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.learners.remove(&id).is_none() {
            return Ok(false);
        }
        tables.attempts.retain(|_, a| a.learner_id != id);
        tables.submissions.retain(|_, s| s.learner_id != id);
        Ok(true)
    }
}

#[async_trait]
impl FacultyRoster for MemoryStore {
    async fn insert_faculty(&self, faculty: NewFaculty) -> Result<Faculty, AppError> {
        let mut tables = self.tables.write().await;

        if tables.faculty.values().any(|f| f.email == faculty.email) {
            return Err(AppError::Conflict(format!(
                "Faculty '{}' is already registered",
                faculty.email
            )));
        }

        let id = tables.next_id();
        let stored = Faculty {
            id,
            name: faculty.name,
            email: faculty.email,
            department: faculty.department,
            created_at: Utc::now(),
        };
        tables.faculty.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_faculty(&self) -> Result<Vec<Faculty>, AppError> {
        Ok(self.tables.read().await.faculty.values().cloned().collect())
    }

    async fn find_faculty_by_email(&self, email: &str) -> Result<Option<Faculty>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.faculty.values().find(|f| f.email == email).cloned())
    }

    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.faculty.remove(&id).is_some())
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let stored = Assignment {
            id,
            title: assignment.title,
            description: assignment.description,
            deadline: assignment.deadline,
            created_by: assignment.created_by,
            created_at: Utc::now(),
        };
        tables.assignments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<Assignment> = tables.assignments.values().cloned().collect();
        assignments.sort_by_key(|a| (a.deadline, a.id));
        Ok(assignments)
    }

    async fn find_assignment(&self, id: i64) -> Result<Option<Assignment>, AppError> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    async fn assignments_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Assignment>, AppError> {
        let tables = self.tables.read().await;
        let mut due: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|a| a.deadline >= from && a.deadline <= to)
            .cloned()
            .collect();
        due.sort_by_key(|a| (a.deadline, a.id));
        Ok(due)
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.assignments.contains_key(&submission.assignment_id) {
            return Err(AppError::NotFound("Assignment not found".to_string()));
        }
        if !tables.learners.contains_key(&submission.learner_id) {
            return Err(AppError::NotFound("Learner not found".to_string()));
        }
        if tables.submissions.values().any(|s| {
            s.learner_id == submission.learner_id && s.assignment_id == submission.assignment_id
        }) {
            return Err(AppError::Conflict(
                "Assignment already submitted by this learner".to_string(),
            ));
        }

        let id = tables.next_id();
        let stored = Submission {
            id,
            learner_id: submission.learner_id,
            assignment_id: submission.assignment_id,
            content: submission.content,
            status: "submitted".to_string(),
            submitted_at: Utc::now(),
        };
        tables.submissions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.submission_details(|s| s.assignment_id == assignment_id))
    }

    async fn submissions_for_learner(
        &self,
        learner_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.submission_details(|s| s.learner_id == learner_id))
    }
}
