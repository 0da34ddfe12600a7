// src/services/catalog.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    config::{DEFAULT_QUESTION_POINTS, DEFAULT_TIME_LIMIT_MINUTES, MAX_QUESTIONS_PER_QUIZ},
    error::AppError,
    models::quiz::{CreateQuestionRequest, CreateQuizRequest, NewQuiz, Question, Quiz, QuizSummary},
    store::QuizRepository,
    utils::html::clean_optional,
};

/// Owns quiz definitions. Validation happens here, before anything reaches storage.
#[derive(Clone)]
pub struct QuizCatalog {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizCatalog {
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Validates the definition, derives `total_points` and stores the quiz.
    pub async fn create_quiz(&self, req: CreateQuizRequest) -> Result<Quiz, AppError> {
        let new_quiz = build_quiz(req)?;
        let quiz = self.quizzes.insert_quiz(new_quiz).await?;

        tracing::info!(
            quiz_id = quiz.id,
            questions = quiz.questions.len(),
            total_points = quiz.total_points,
            "Quiz created: {}",
            quiz.title
        );

        Ok(quiz)
    }

    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError> {
        self.quizzes.list_quizzes().await
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Quiz, AppError> {
        self.quizzes
            .find_quiz(id)
            .await?
            .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }
}

fn build_quiz(req: CreateQuizRequest) -> Result<NewQuiz, AppError> {
    req.validate()?;

    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    if req.questions.is_empty() {
        return Err(AppError::Validation(
            "At least one question is required".to_string(),
        ));
    }
    if req.questions.len() > MAX_QUESTIONS_PER_QUIZ {
        return Err(AppError::Validation(format!(
            "A quiz may hold at most {} questions",
            MAX_QUESTIONS_PER_QUIZ
        )));
    }

    let questions = req
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| build_question(index, question))
        .collect::<Result<Vec<_>, _>>()?;

    let total_points: i32 = questions.iter().map(|q| q.points).sum();

    Ok(NewQuiz {
        title,
        description: clean_optional(req.description.as_deref()),
        created_by: req
            .created_by
            .map(|author| author.trim().to_string())
            .filter(|author| !author.is_empty()),
        questions,
        total_points,
        time_limit: req.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
    })
}

fn build_question(index: usize, req: CreateQuestionRequest) -> Result<Question, AppError> {
    let position = index + 1;

    req.validate()
        .map_err(|e| AppError::Validation(format!("Question {}: {}", position, e)))?;

    let correct_answer = req.correct_answer.ok_or_else(|| {
        AppError::Validation(format!("Question {}: correct answer is required", position))
    })?;

    let in_range = usize::try_from(correct_answer)
        .map(|i| i < req.options.len())
        .unwrap_or(false);
    if !in_range {
        return Err(AppError::Validation(format!(
            "Question {}: correct answer {} does not reference one of its {} options",
            position,
            correct_answer,
            req.options.len()
        )));
    }

    Ok(Question {
        prompt: req.prompt.trim().to_string(),
        options: req.options,
        correct_answer,
        points: req.points.unwrap_or(DEFAULT_QUESTION_POINTS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn catalog() -> QuizCatalog {
        QuizCatalog::new(Arc::new(MemoryStore::default()))
    }

    fn question(correct: i32, points: Option<i32>) -> CreateQuestionRequest {
        CreateQuestionRequest {
            prompt: "Which keyword moves a closure's captures?".into(),
            options: vec!["move".into(), "ref".into(), "static".into()],
            correct_answer: Some(correct),
            points,
        }
    }

    fn request(questions: Vec<CreateQuestionRequest>) -> CreateQuizRequest {
        CreateQuizRequest {
            title: "Closures".into(),
            description: Some("Capture modes".into()),
            created_by: Some("admin@example.com".into()),
            questions,
            time_limit: None,
        }
    }

    fn assert_validation(result: Result<Quiz, AppError>) {
        match result {
            Err(AppError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn total_points_sum_question_points() {
        let quiz = catalog()
            .create_quiz(request(vec![question(0, Some(5)), question(1, Some(7))]))
            .await
            .unwrap();

        assert_eq!(quiz.total_points, 12);
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.time_limit, DEFAULT_TIME_LIMIT_MINUTES);
    }

    #[tokio::test]
    async fn unset_points_default_to_one() {
        let quiz = catalog()
            .create_quiz(request(vec![question(0, None), question(2, None), question(1, Some(3))]))
            .await
            .unwrap();

        assert_eq!(quiz.total_points, 5);
        assert_eq!(quiz.questions[0].points, 1);
    }

    #[tokio::test]
    async fn single_option_question_is_rejected() {
        let mut lonely = question(0, Some(1));
        lonely.options = vec!["only".into()];

        assert_validation(catalog().create_quiz(request(vec![lonely])).await);
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let mut req = request(vec![question(0, Some(1))]);
        req.title = "   ".into();

        assert_validation(catalog().create_quiz(req).await);
    }

    #[tokio::test]
    async fn empty_question_list_is_rejected() {
        assert_validation(catalog().create_quiz(request(vec![])).await);
    }

    #[tokio::test]
    async fn out_of_range_answer_key_is_rejected() {
        assert_validation(catalog().create_quiz(request(vec![question(3, Some(1))])).await);
        assert_validation(catalog().create_quiz(request(vec![question(-1, Some(1))])).await);
    }

    #[tokio::test]
    async fn missing_answer_key_is_rejected() {
        let mut no_key = question(0, Some(1));
        no_key.correct_answer = None;

        assert_validation(catalog().create_quiz(request(vec![no_key])).await);
    }

    #[tokio::test]
    async fn non_positive_points_are_rejected() {
        assert_validation(catalog().create_quiz(request(vec![question(0, Some(0))])).await);
        assert_validation(catalog().create_quiz(request(vec![question(0, Some(-4))])).await);
    }

    #[tokio::test]
    async fn rejected_quiz_is_not_stored() {
        let catalog = catalog();
        let _ = catalog.create_quiz(request(vec![question(9, Some(1))])).await;

        assert!(catalog.list_quizzes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let result = catalog().get_quiz(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn refetching_returns_identical_quiz() {
        let catalog = catalog();
        let created = catalog
            .create_quiz(request(vec![question(1, Some(2))]))
            .await
            .unwrap();

        let first = catalog.get_quiz(created.id).await.unwrap();
        let second = catalog.get_quiz(created.id).await.unwrap();

        assert_eq!(first, created);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn listing_omits_questions() {
        let catalog = catalog();
        catalog
            .create_quiz(request(vec![question(0, Some(2)), question(0, Some(2))]))
            .await
            .unwrap();

        let summaries = catalog.list_quizzes().await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].question_count, 2);
        assert_eq!(summaries[0].total_points, 4);
    }
}
