// src/services/analytics.rs

use std::{collections::HashSet, sync::Arc};

use crate::{
    error::AppError,
    models::{analytics::AnalyticsReport, attempt::AttemptDetail},
    services::grading::{percent_of, round2},
    store::{AttemptRepository, LearnerRoster, QuizRepository, Store},
};

/// Summarises stored attempts for a quiz against the learner roster.
#[derive(Clone)]
pub struct Analytics {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    learners: Arc<dyn LearnerRoster>,
}

/// Score statistics over a set of attempts.
#[derive(Debug, Clone, PartialEq)]
struct ScoreSummary {
    average: f64,
    max: i32,
    min: i32,
}

impl Analytics {
    pub fn new(store: &Store) -> Self {
        Self {
            quizzes: store.quizzes.clone(),
            attempts: store.attempts.clone(),
            learners: store.learners.clone(),
        }
    }

    pub async fn compute_analytics(&self, quiz_id: i64) -> Result<AnalyticsReport, AppError> {
        let quiz = self
            .quizzes
            .find_quiz(quiz_id)
            .await?
            .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

        let attempts = self.attempts.attempts_for_quiz(quiz_id).await?;
        let total_learners = self.learners.count_learners().await?;

        // Participation counts distinct learners, so retakes never push
        // `not_attempted` below zero.
        let attempted_count = distinct_learners(&attempts);
        let not_attempted = (total_learners - attempted_count).max(0);
        let scores = summarize_scores(&attempts);

        Ok(AnalyticsReport {
            quiz_id: quiz.id,
            quiz_title: quiz.title,
            total_points: quiz.total_points,
            total_learners,
            attempt_count: attempts.len() as i64,
            attempted_count,
            not_attempted,
            average_score: scores.average,
            max_score: scores.max,
            min_score: scores.min,
            success_rate: percent_of(attempted_count as f64, total_learners as f64),
            attempts,
        })
    }
}

fn distinct_learners(attempts: &[AttemptDetail]) -> i64 {
    attempts
        .iter()
        .map(|a| a.attempt.learner_id)
        .collect::<HashSet<_>>()
        .len() as i64
}

fn summarize_scores(attempts: &[AttemptDetail]) -> ScoreSummary {
    let scores: Vec<i32> = attempts.iter().map(|a| a.attempt.total_score).collect();

    let (Some(&max), Some(&min)) = (scores.iter().max(), scores.iter().min()) else {
        return ScoreSummary {
            average: 0.0,
            max: 0,
            min: 0,
        };
    };

    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();

    ScoreSummary {
        average: round2(sum as f64 / scores.len() as f64),
        max,
        min,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        attempt::NewAttempt,
        learner::{Learner, NewLearner},
        quiz::{CreateQuestionRequest, CreateQuizRequest, Quiz},
    };
    use crate::services::catalog::QuizCatalog;
    use crate::store::AttemptPolicy;

    async fn quiz(store: &Store) -> Quiz {
        QuizCatalog::new(store.quizzes.clone())
            .create_quiz(CreateQuizRequest {
                title: "Lifetimes".into(),
                questions: vec![CreateQuestionRequest {
                    prompt: "'static means?".into(),
                    options: vec!["lives for the whole program".into(), "is immutable".into()],
                    correct_answer: Some(0),
                    points: Some(10),
                }],
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn enroll(store: &Store, count: usize) -> Vec<Learner> {
        let mut learners = Vec::new();
        for i in 0..count {
            learners.push(
                store
                    .learners
                    .insert_learner(NewLearner {
                        name: format!("Learner {i}"),
                        email: format!("learner{i}@example.com"),
                        department: None,
                    })
                    .await
                    .unwrap(),
            );
        }
        learners
    }

    async fn attempt(store: &Store, learner: &Learner, quiz: &Quiz, score: i32) {
        store
            .attempts
            .insert_attempt(
                NewAttempt {
                    learner_id: learner.id,
                    quiz_id: quiz.id,
                    answers: vec![],
                    total_score: score,
                    percentage: percent_of(score as f64, quiz.total_points as f64),
                    started_at: None,
                    submitted_at: Utc::now(),
                    time_spent_secs: None,
                },
                AttemptPolicy::AllowRetakes,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_attempts_yields_zeroed_report() {
        let store = Store::in_memory();
        let quiz = quiz(&store).await;
        enroll(&store, 10).await;

        let report = Analytics::new(&store).compute_analytics(quiz.id).await.unwrap();

        assert_eq!(report.total_learners, 10);
        assert_eq!(report.attempted_count, 0);
        assert_eq!(report.not_attempted, 10);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.max_score, 0);
        assert_eq!(report.min_score, 0);
        assert_eq!(report.success_rate, 0.00);
        assert!(report.attempts.is_empty());
    }

    #[tokio::test]
    async fn scores_are_aggregated() {
        let store = Store::in_memory();
        let quiz = quiz(&store).await;
        let learners = enroll(&store, 4).await;
        attempt(&store, &learners[0], &quiz, 10).await;
        attempt(&store, &learners[1], &quiz, 0).await;
        attempt(&store, &learners[2], &quiz, 5).await;

        let report = Analytics::new(&store).compute_analytics(quiz.id).await.unwrap();

        assert_eq!(report.attempted_count, 3);
        assert_eq!(report.not_attempted, 1);
        assert_eq!(report.average_score, 5.0);
        assert_eq!(report.max_score, 10);
        assert_eq!(report.min_score, 0);
        assert_eq!(report.success_rate, 75.00);
        assert_eq!(report.attempts.len(), 3);
    }

    #[tokio::test]
    async fn retakes_count_learners_once() {
        let store = Store::in_memory();
        let quiz = quiz(&store).await;
        let learners = enroll(&store, 2).await;
        attempt(&store, &learners[0], &quiz, 0).await;
        attempt(&store, &learners[0], &quiz, 10).await;
        attempt(&store, &learners[0], &quiz, 10).await;

        let report = Analytics::new(&store).compute_analytics(quiz.id).await.unwrap();

        assert_eq!(report.attempt_count, 3);
        assert_eq!(report.attempted_count, 1);
        assert_eq!(report.not_attempted, 1);
        assert_eq!(report.success_rate, 50.00);
        assert_eq!(report.average_score, 6.67);
    }

    #[tokio::test]
    async fn empty_roster_does_not_divide_by_zero() {
        let store = Store::in_memory();
        let quiz = quiz(&store).await;

        let report = Analytics::new(&store).compute_analytics(quiz.id).await.unwrap();

        assert_eq!(report.total_learners, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.success_rate.is_finite());
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let store = Store::in_memory();

        let result = Analytics::new(&store).compute_analytics(77).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
