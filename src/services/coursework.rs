// src/services/coursework.rs

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::{
    config::{DEFAULT_SUBMISSION_CONTENT, REMINDER_WINDOW_HOURS},
    error::AppError,
    models::assignment::{
        Assignment, AssignmentStats, CreateAssignmentRequest, NewAssignment, NewSubmission,
        ReminderNotice, Submission, SubmissionDetail, SubmitAssignmentRequest,
    },
    services::grading::percent_of,
    store::{AssignmentRepository, FacultyRoster, LearnerRoster, Store},
    utils::html::clean_html,
};

/// Assignment posting, submission and deadline tracking.
#[derive(Clone)]
pub struct Coursework {
    assignments: Arc<dyn AssignmentRepository>,
    learners: Arc<dyn LearnerRoster>,
    faculty: Arc<dyn FacultyRoster>,
}

impl Coursework {
    pub fn new(store: &Store) -> Self {
        Self {
            assignments: store.assignments.clone(),
            learners: store.learners.clone(),
            faculty: store.faculty.clone(),
        }
    }

    pub async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment, AppError> {
        req.validate()?;

        let deadline = req
            .deadline
            .ok_or(AppError::Validation("Deadline is required".to_string()))?;
        let title = req.title.trim().to_string();
        let description = clean_html(&req.description);
        let created_by = req.created_by.trim().to_lowercase();
        if title.is_empty() || description.is_empty() || created_by.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        // The author must be a registered faculty member.
        self.faculty
            .find_faculty_by_email(&created_by)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Faculty '{}' not found", created_by)))?;

        let assignment = self
            .assignments
            .insert_assignment(NewAssignment {
                title,
                description,
                deadline,
                created_by,
            })
            .await?;

        tracing::info!(
            assignment_id = assignment.id,
            deadline = %assignment.deadline,
            "Assignment posted: {}",
            assignment.title
        );

        Ok(assignment)
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        self.assignments.list_assignments().await
    }

    /// One submission per learner and assignment; a second one is a conflict.
    pub async fn submit(
        &self,
        assignment_id: i64,
        req: SubmitAssignmentRequest,
    ) -> Result<Submission, AppError> {
        req.validate()?;

        let learner_id = req
            .learner_id
            .ok_or(AppError::Validation("learner_id is required".to_string()))?;

        self.require_assignment(assignment_id).await?;
        self.learners
            .find_learner(learner_id)
            .await?
            .ok_or(AppError::NotFound("Learner not found".to_string()))?;

        let content = req
            .content
            .map(|c| clean_html(&c))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBMISSION_CONTENT.to_string());

        let submission = self
            .assignments
            .insert_submission(NewSubmission {
                learner_id,
                assignment_id,
                content,
            })
            .await?;

        tracing::info!(
            submission_id = submission.id,
            learner_id,
            assignment_id,
            "Assignment submitted"
        );

        Ok(submission)
    }

    pub async fn submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        self.require_assignment(assignment_id).await?;
        self.assignments.submissions_for_assignment(assignment_id).await
    }

    pub async fn submissions_for_learner(
        &self,
        learner_id: i64,
    ) -> Result<Vec<SubmissionDetail>, AppError> {
        self.learners
            .find_learner(learner_id)
            .await?
            .ok_or(AppError::NotFound("Learner not found".to_string()))?;
        self.assignments.submissions_for_learner(learner_id).await
    }

    pub async fn assignment_stats(&self, assignment_id: i64) -> Result<AssignmentStats, AppError> {
        let assignment = self.require_assignment(assignment_id).await?;
        let submissions = self.assignments.submissions_for_assignment(assignment_id).await?;
        let learners = self.learners.list_learners().await?;

        let submitted: HashSet<i64> = submissions.iter().map(|s| s.submission.learner_id).collect();
        let not_submitted: Vec<_> = learners
            .into_iter()
            .filter(|l| !submitted.contains(&l.id))
            .collect();

        let submitted_count = submitted.len() as i64;
        let total_learners = submitted_count + not_submitted.len() as i64;

        Ok(AssignmentStats {
            assignment_id: assignment.id,
            assignment_title: assignment.title,
            total_learners,
            submitted_count,
            not_submitted_count: not_submitted.len() as i64,
            submission_rate: percent_of(submitted_count as f64, total_learners as f64),
            submissions,
            not_submitted,
        })
    }

    /// Learners who have not submitted an assignment due within the reminder window.
    pub async fn pending_reminders(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderNotice>, AppError> {
        let due = self
            .assignments
            .assignments_due_between(now, now + Duration::hours(REMINDER_WINDOW_HOURS))
            .await?;
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let learners = self.learners.list_learners().await?;
        let mut notices = Vec::new();

        for assignment in due {
            let submitted: HashSet<i64> = self
                .assignments
                .submissions_for_assignment(assignment.id)
                .await?
                .iter()
                .map(|s| s.submission.learner_id)
                .collect();

            notices.extend(
                learners
                    .iter()
                    .filter(|l| !submitted.contains(&l.id))
                    .map(|l| ReminderNotice {
                        assignment_id: assignment.id,
                        assignment_title: assignment.title.clone(),
                        deadline: assignment.deadline,
                        learner_id: l.id,
                        learner_name: l.name.clone(),
                        learner_email: l.email.clone(),
                    }),
            );
        }

        tracing::info!(count = notices.len(), "Pending reminders computed");

        Ok(notices)
    }

    async fn require_assignment(&self, id: i64) -> Result<Assignment, AppError> {
        self.assignments
            .find_assignment(id)
            .await?
            .ok_or(AppError::NotFound("Assignment not found".to_string()))
    }
}
