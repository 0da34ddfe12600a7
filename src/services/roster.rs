// src/services/roster.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::learner::{CreateLearnerRequest, Learner, NewLearner},
    store::LearnerRoster,
};

/// Learner enrollment on top of the roster collaborator.
#[derive(Clone)]
pub struct Roster {
    learners: Arc<dyn LearnerRoster>,
}

impl Roster {
    pub fn new(learners: Arc<dyn LearnerRoster>) -> Self {
        Self { learners }
    }

    pub async fn enroll(&self, req: CreateLearnerRequest) -> Result<Learner, AppError> {
        req.validate()?;

        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let learner = self
            .learners
            .insert_learner(NewLearner {
                name,
                // Emails are compared case-insensitively.
                email: req.email.trim().to_lowercase(),
                department: req
                    .department
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            })
            .await?;

        tracing::info!(learner_id = learner.id, "Learner enrolled: {}", learner.email);

        Ok(learner)
    }

    pub async fn list(&self) -> Result<Vec<Learner>, AppError> {
        self.learners.list_learners().await
    }

    pub async fn get(&self, id: i64) -> Result<Learner, AppError> {
        self.learners
            .find_learner(id)
            .await?
            .ok_or(AppError::NotFound("Learner not found".to_string()))
    }

    /// Removes the learner along with their attempts and submissions.
    pub async fn remove(&self, id: i64) -> Result<(), AppError> {
        if !self.learners.delete_learner(id).await? {
            return Err(AppError::NotFound("Learner not found".to_string()));
        }

        tracing::info!(learner_id = id, "Learner removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn roster() -> Roster {
        Roster::new(Arc::new(MemoryStore::default()))
    }

    fn request(name: &str, email: &str) -> CreateLearnerRequest {
        CreateLearnerRequest {
            name: name.into(),
            email: email.into(),
            department: Some("  CS ".into()),
        }
    }

    #[tokio::test]
    async fn enroll_normalizes_fields() {
        let learner = roster()
            .enroll(request(" Grace ", "Grace@Example.com"))
            .await
            .unwrap();

        assert_eq!(learner.name, "Grace");
        assert_eq!(learner.email, "grace@example.com");
        assert_eq!(learner.department.as_deref(), Some("CS"));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let roster = roster();
        roster.enroll(request("Grace", "grace@example.com")).await.unwrap();

        let again = roster.enroll(request("Other", "GRACE@example.com")).await;

        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(roster.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_input_is_rejected() {
        let roster = roster();

        assert!(matches!(
            roster.enroll(request("Grace", "not-an-email")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            roster.enroll(request("", "grace@example.com")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn remove_unknown_learner_is_not_found() {
        let roster = roster();
        let learner = roster.enroll(request("Grace", "grace@example.com")).await.unwrap();

        roster.remove(learner.id).await.unwrap();

        assert!(matches!(roster.remove(learner.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(roster.get(learner.id).await, Err(AppError::NotFound(_))));
    }
}
