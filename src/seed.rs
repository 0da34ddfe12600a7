// src/seed.rs

use crate::{
    error::AppError,
    models::quiz::{CreateQuestionRequest, CreateQuizRequest},
    services::catalog::QuizCatalog,
};

/// Author label stored on seeded quizzes.
const SEED_AUTHOR: &str = "system";

/// Seeds the catalog with a few starter quizzes when it is empty.
/// Returns how many quizzes were created; 0 means the catalog already had content.
pub async fn seed_sample_quizzes(catalog: &QuizCatalog) -> Result<usize, AppError> {
    if !catalog.list_quizzes().await?.is_empty() {
        return Ok(0);
    }

    let quizzes = sample_quizzes();
    let count = quizzes.len();
    for quiz in quizzes {
        catalog.create_quiz(quiz).await?;
    }

    Ok(count)
}

fn question(prompt: &str, options: &[&str], correct: i32, points: i32) -> CreateQuestionRequest {
    CreateQuestionRequest {
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: Some(correct),
        points: Some(points),
    }
}

fn sample_quizzes() -> Vec<CreateQuizRequest> {
    vec![
        CreateQuizRequest {
            title: "Ownership Basics".to_string(),
            description: Some("Moves, borrows and lifetimes.".to_string()),
            created_by: Some(SEED_AUTHOR.to_string()),
            questions: vec![
                question(
                    "What happens to a String after it is moved into a function?",
                    &["It is copied", "The caller can no longer use it", "It becomes 'static"],
                    1,
                    2,
                ),
                question(
                    "How many mutable references to a value may exist at once?",
                    &["One", "Two", "Unlimited"],
                    0,
                    2,
                ),
                question(
                    "Which trait lets a type be duplicated implicitly?",
                    &["Clone", "Copy", "Default", "Send"],
                    1,
                    1,
                ),
            ],
            time_limit: Some(15),
        },
        CreateQuizRequest {
            title: "Error Handling".to_string(),
            description: Some("Result, Option and the ? operator.".to_string()),
            created_by: Some(SEED_AUTHOR.to_string()),
            questions: vec![
                question(
                    "What does the ? operator do on an Err value?",
                    &["Panics", "Returns it early from the function", "Ignores it"],
                    1,
                    3,
                ),
                question(
                    "Which method turns an Option into a Result?",
                    &["ok_or", "unwrap_or", "map"],
                    0,
                    2,
                ),
            ],
            time_limit: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeds_empty_catalog_once() {
        let catalog = QuizCatalog::new(Arc::new(MemoryStore::default()));

        let first = seed_sample_quizzes(&catalog).await.unwrap();
        let second = seed_sample_quizzes(&catalog).await.unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);

        let listed = catalog.list_quizzes().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|q| q.title == "Ownership Basics" && q.total_points == 5));
    }
}
