// src/models/analytics.rs

use serde::Serialize;

use crate::models::attempt::AttemptDetail;

/// Aggregate statistics over every stored attempt for one quiz.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub total_points: i32,

    /// Size of the learner roster.
    pub total_learners: i64,
    /// Raw number of stored attempts, retakes included.
    pub attempt_count: i64,
    /// Distinct learners with at least one attempt.
    pub attempted_count: i64,
    pub not_attempted: i64,

    pub average_score: f64,
    pub max_score: i32,
    pub min_score: i32,
    /// Share of the roster that attempted the quiz, in percent.
    pub success_rate: f64,

    pub attempts: Vec<AttemptDetail>,
}
