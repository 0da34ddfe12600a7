// src/services/attempts.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, AttemptDetail, AttemptResult, NewAttempt, SubmitAttemptRequest},
        learner::Learner,
        quiz::Quiz,
    },
    services::grading::evaluate,
    store::{AttemptPolicy, AttemptRepository, LearnerRoster, QuizRepository, Store},
};

/// Stores graded attempts and serves the history views.
#[derive(Clone)]
pub struct AttemptLog {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    learners: Arc<dyn LearnerRoster>,
    policy: AttemptPolicy,
}

impl AttemptLog {
    pub fn new(store: &Store, policy: AttemptPolicy) -> Self {
        Self {
            quizzes: store.quizzes.clone(),
            attempts: store.attempts.clone(),
            learners: store.learners.clone(),
            policy,
        }
    }

    /// Grades a learner's answers and durably records the attempt before returning.
    /// Either the attempt is stored or an error comes back; there is no partial record.
    pub async fn submit(
        &self,
        quiz_id: i64,
        req: SubmitAttemptRequest,
    ) -> Result<AttemptResult, AppError> {
        let learner_id = req
            .learner_id
            .ok_or(AppError::Validation("learner_id is required".to_string()))?;
        let answers = req
            .answers
            .ok_or(AppError::Validation("answers are required".to_string()))?;

        let quiz = self.require_quiz(quiz_id).await?;
        self.require_learner(learner_id).await?;

        let submitted_at = Utc::now();
        let time_spent_secs = match req.started_at {
            Some(started_at) if started_at > submitted_at => {
                return Err(AppError::Validation(
                    "started_at cannot be later than the submission time".to_string(),
                ));
            }
            Some(started_at) => Some((submitted_at - started_at).num_seconds()),
            None => None,
        };

        let evaluation = evaluate(&quiz, &answers);

        let attempt = self
            .insert(NewAttempt {
                learner_id,
                quiz_id: quiz.id,
                answers: evaluation.answers,
                total_score: evaluation.total_score,
                percentage: evaluation.percentage,
                started_at: req.started_at,
                submitted_at,
                time_spent_secs,
            })
            .await?;

        Ok(AttemptResult {
            attempt_id: attempt.id,
            quiz_id: attempt.quiz_id,
            learner_id: attempt.learner_id,
            score: attempt.total_score,
            total_points: quiz.total_points,
            percentage: attempt.percentage,
            answers: attempt.answers.0,
            submitted_at: attempt.submitted_at,
            time_spent_secs: attempt.time_spent_secs,
        })
    }

    /// Persists an already graded attempt after resolving its quiz and learner.
    pub async fn record_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        self.require_quiz(attempt.quiz_id).await?;
        self.require_learner(attempt.learner_id).await?;
        self.insert(attempt).await
    }

    pub async fn get_attempt(&self, id: i64) -> Result<Attempt, AppError> {
        self.attempts
            .find_attempt(id)
            .await?
            .ok_or(AppError::NotFound("Attempt not found".to_string()))
    }

    pub async fn attempts_for_learner(&self, learner_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        self.require_learner(learner_id).await?;
        self.attempts.attempts_for_learner(learner_id).await
    }

    pub async fn attempts_for_quiz(&self, quiz_id: i64) -> Result<Vec<AttemptDetail>, AppError> {
        self.require_quiz(quiz_id).await?;
        self.attempts.attempts_for_quiz(quiz_id).await
    }

    /// Every stored attempt, newest first.
    pub async fn all_attempts(&self) -> Result<Vec<AttemptDetail>, AppError> {
        self.attempts.all_attempts().await
    }

    async fn insert(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let learner_id = attempt.learner_id;
        let quiz_id = attempt.quiz_id;

        match self.attempts.insert_attempt(attempt, self.policy).await {
            Ok(stored) => {
                tracing::info!(
                    attempt_id = stored.id,
                    learner_id,
                    quiz_id,
                    score = stored.total_score,
                    "Quiz attempt recorded"
                );
                Ok(stored)
            }
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(learner_id, quiz_id, "Retake rejected: {}", msg);
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    async fn require_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError> {
        self.quizzes
            .find_quiz(quiz_id)
            .await?
            .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }

    async fn require_learner(&self, learner_id: i64) -> Result<Learner, AppError> {
        self.learners
            .find_learner(learner_id)
            .await?
            .ok_or(AppError::NotFound("Learner not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{
        attempt::SubmittedAnswer,
        learner::NewLearner,
        quiz::{CreateQuestionRequest, CreateQuizRequest},
    };
    use crate::services::catalog::QuizCatalog;

    struct Fixture {
        store: Store,
        quiz: Quiz,
        learner: Learner,
    }

    async fn fixture() -> Fixture {
        let store = Store::in_memory();
        let quiz = QuizCatalog::new(store.quizzes.clone())
            .create_quiz(CreateQuizRequest {
                title: "Traits".into(),
                questions: vec![
                    CreateQuestionRequest {
                        prompt: "Dynamic dispatch uses?".into(),
                        options: vec!["dyn Trait".into(), "impl Trait".into()],
                        correct_answer: Some(0),
                        points: Some(5),
                    },
                    CreateQuestionRequest {
                        prompt: "Static dispatch uses?".into(),
                        options: vec!["dyn Trait".into(), "impl Trait".into()],
                        correct_answer: Some(0),
                        points: Some(5),
                    },
                ],
                ..Default::default()
            })
            .await
            .unwrap();
        let learner = store
            .learners
            .insert_learner(NewLearner {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                department: None,
            })
            .await
            .unwrap();

        Fixture { store, quiz, learner }
    }

    fn submission(learner_id: i64, picks: &[i64]) -> SubmitAttemptRequest {
        SubmitAttemptRequest {
            learner_id: Some(learner_id),
            answers: Some(
                picks
                    .iter()
                    .map(|&selected_option| SubmittedAnswer { selected_option })
                    .collect(),
            ),
            started_at: None,
        }
    }

    #[tokio::test]
    async fn submission_is_graded_and_stored() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        let result = log.submit(f.quiz.id, submission(f.learner.id, &[0, 1])).await.unwrap();

        assert_eq!(result.score, 5);
        assert_eq!(result.total_points, 10);
        assert_eq!(result.percentage, 50.00);
        assert_eq!(result.answers.len(), 2);

        let stored = log.get_attempt(result.attempt_id).await.unwrap();
        assert_eq!(stored.total_score, 5);
        assert_eq!(stored, log.get_attempt(result.attempt_id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        let mut no_learner = submission(f.learner.id, &[0]);
        no_learner.learner_id = None;
        let mut no_answers = submission(f.learner.id, &[0]);
        no_answers.answers = None;

        assert!(matches!(log.submit(f.quiz.id, no_learner).await, Err(AppError::Validation(_))));
        assert!(matches!(log.submit(f.quiz.id, no_answers).await, Err(AppError::Validation(_))));
        assert!(log.all_attempts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_quiz_or_learner_is_not_found() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        let unknown_quiz = log.submit(9999, submission(f.learner.id, &[0])).await;
        let unknown_learner = log.submit(f.quiz.id, submission(9999, &[0])).await;

        assert!(matches!(unknown_quiz, Err(AppError::NotFound(_))));
        assert!(matches!(unknown_learner, Err(AppError::NotFound(_))));
        assert!(log.all_attempts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retakes_append_when_allowed() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        log.submit(f.quiz.id, submission(f.learner.id, &[1, 1])).await.unwrap();
        log.submit(f.quiz.id, submission(f.learner.id, &[0, 0])).await.unwrap();

        let history = log.attempts_for_learner(f.learner.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quiz_title, "Traits");
    }

    #[tokio::test]
    async fn retakes_conflict_under_single_attempt_policy() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::SingleAttempt);

        log.submit(f.quiz.id, submission(f.learner.id, &[0, 0])).await.unwrap();
        let second = log.submit(f.quiz.id, submission(f.learner.id, &[0, 0])).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(log.attempts_for_quiz(f.quiz.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_attempt_requires_known_references() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        let result = log
            .record_attempt(NewAttempt {
                learner_id: f.learner.id,
                quiz_id: 4242,
                answers: vec![],
                total_score: 0,
                percentage: 0.0,
                started_at: None,
                submitted_at: Utc::now(),
                time_spent_secs: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn all_attempts_are_newest_first() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);
        let now = Utc::now();

        for minutes_ago in [30, 5, 60] {
            log.record_attempt(NewAttempt {
                learner_id: f.learner.id,
                quiz_id: f.quiz.id,
                answers: vec![],
                total_score: minutes_ago,
                percentage: 0.0,
                started_at: None,
                submitted_at: now - Duration::minutes(i64::from(minutes_ago)),
                time_spent_secs: None,
            })
            .await
            .unwrap();
        }

        let scores: Vec<i32> = log
            .all_attempts()
            .await
            .unwrap()
            .iter()
            .map(|d| d.attempt.total_score)
            .collect();
        assert_eq!(scores, vec![5, 30, 60]);
    }

    #[tokio::test]
    async fn time_spent_is_derived_from_start() {
        let f = fixture().await;
        let log = AttemptLog::new(&f.store, AttemptPolicy::AllowRetakes);

        let mut req = submission(f.learner.id, &[0, 0]);
        req.started_at = Some(Utc::now() - Duration::seconds(90));
        let result = log.submit(f.quiz.id, req).await.unwrap();
        let spent = result.time_spent_secs.unwrap();
        assert!((90..=95).contains(&spent));

        let mut future = submission(f.learner.id, &[0, 0]);
        future.started_at = Some(Utc::now() + Duration::hours(1));
        assert!(matches!(log.submit(f.quiz.id, future).await, Err(AppError::Validation(_))));
    }
}
