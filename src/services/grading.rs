// src/services/grading.rs

use crate::models::{
    attempt::{GradedAnswer, SubmittedAnswer},
    quiz::Quiz,
};

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub answers: Vec<GradedAnswer>,
    pub total_score: i32,
    pub percentage: f64,
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded to 2 decimals. A non-positive `whole` yields 0.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

/// Grades `submitted` against the quiz's answer key.
///
/// Answers are matched to questions by position. Only the supplied prefix is
/// graded when fewer answers than questions arrive; answers beyond the last
/// question are ignored. A selected option that does not exist is simply
/// wrong. Pure: no I/O, no hidden state.
pub fn evaluate(quiz: &Quiz, submitted: &[SubmittedAnswer]) -> Evaluation {
    let answers: Vec<GradedAnswer> = quiz
        .questions
        .iter()
        .zip(submitted)
        .enumerate()
        .map(|(index, (question, answer))| {
            let is_correct = answer.selected_option == i64::from(question.correct_answer);
            GradedAnswer {
                question_index: index,
                selected_option: answer.selected_option,
                is_correct,
                points_earned: if is_correct { question.points } else { 0 },
            }
        })
        .collect();

    let total_score: i32 = answers.iter().map(|a| a.points_earned).sum();
    let percentage = percent_of(f64::from(total_score), f64::from(quiz.total_points));

    Evaluation {
        answers,
        total_score,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;
    use crate::models::quiz::Question;

    fn quiz_with(points: &[i32], correct: &[i32]) -> Quiz {
        let questions: Vec<Question> = points
            .iter()
            .zip(correct)
            .enumerate()
            .map(|(i, (&points, &correct_answer))| Question {
                prompt: format!("Question {}", i + 1),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer,
                points,
            })
            .collect();

        Quiz {
            id: 1,
            title: "Ownership".into(),
            description: None,
            created_by: None,
            total_points: points.iter().sum(),
            questions: Json(questions),
            time_limit: 30,
            created_at: Utc::now(),
        }
    }

    fn picks(options: &[i64]) -> Vec<SubmittedAnswer> {
        options
            .iter()
            .map(|&selected_option| SubmittedAnswer { selected_option })
            .collect()
    }

    #[test]
    fn half_right_scores_fifty_percent() {
        let quiz = quiz_with(&[5, 5], &[0, 0]);

        let result = evaluate(&quiz, &picks(&[0, 1]));

        assert_eq!(result.total_score, 5);
        assert_eq!(result.percentage, 50.00);
        assert!(result.answers[0].is_correct);
        assert!(!result.answers[1].is_correct);
        assert_eq!(result.answers[1].points_earned, 0);
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let quiz = quiz_with(&[5, 5, 5, 5], &[0, 1, 2, 3]);

        let result = evaluate(&quiz, &picks(&[0, 1, 2, 3]));

        assert_eq!(result.total_score, 20);
        assert_eq!(result.percentage, 100.00);
    }

    #[test]
    fn nonexistent_option_is_wrong_not_an_error() {
        let quiz = quiz_with(&[3], &[1]);

        let result = evaluate(&quiz, &picks(&[42]));

        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.answers[0].selected_option, 42);
        assert!(!result.answers[0].is_correct);
        assert_eq!(result.total_score, 0);
        assert_eq!(result.percentage, 0.0);
    }

    #[test]
    fn short_submission_grades_only_the_prefix() {
        let quiz = quiz_with(&[2, 2, 2], &[0, 0, 0]);

        let result = evaluate(&quiz, &picks(&[0]));

        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.total_score, 2);
        assert_eq!(result.percentage, 33.33);
    }

    #[test]
    fn extra_answers_are_ignored() {
        let quiz = quiz_with(&[1], &[2]);

        let result = evaluate(&quiz, &picks(&[2, 2, 2]));

        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.total_score, 1);
    }

    #[test]
    fn zero_total_points_yields_zero_percentage() {
        let mut quiz = quiz_with(&[1], &[0]);
        quiz.total_points = 0;

        let result = evaluate(&quiz, &picks(&[0]));

        assert_eq!(result.percentage, 0.0);
        assert!(result.percentage.is_finite());
    }

    #[test]
    fn option_beyond_i32_range_is_wrong() {
        let quiz = quiz_with(&[2], &[1]);

        let result = evaluate(&quiz, &picks(&[5_000_000_000]));

        assert!(!result.answers[0].is_correct);
        assert_eq!(result.answers[0].selected_option, 5_000_000_000);
        assert_eq!(result.total_score, 0);
    }

    #[test]
    fn grading_is_deterministic() {
        let quiz = quiz_with(&[3, 4, 5], &[1, 2, 3]);
        let answers = picks(&[1, 0, 3]);

        assert_eq!(evaluate(&quiz, &answers), evaluate(&quiz, &answers));
    }

    #[test]
    fn percentage_stays_within_bounds() {
        let quiz = quiz_with(&[7, 11, 13], &[0, 1, 2]);

        for selection in [[0, 1, 2], [3, 3, 3], [0, 0, 0], [1, 1, 2]] {
            let result = evaluate(&quiz, &picks(&selection));
            assert!((0.0..=100.0).contains(&result.percentage));
        }
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(percent_of(1.0, 3.0), 33.33);
        assert_eq!(percent_of(5.0, 0.0), 0.0);
    }
}
