//! Quiz API endpoint.

use std::collections::HashSet;

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{Question, QuizRequest};
use crate::quiz::next_question;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct QuizPayload {
    /// `null` once every candidate has been served.
    pub question: Option<Question>,
}

/// POST /quizzes - Next random question the player has not seen yet.
pub async fn play_quiz(
    State(state): State<AppState>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResult<QuizPayload> {
    let category = request
        .quiz_category
        .ok_or_else(|| AppError::BadRequest("quiz_category is required".to_string()))?;
    let previous: HashSet<i64> = request
        .previous_questions
        .unwrap_or_default()
        .into_iter()
        .collect();

    let pool = state.repo.questions_in_category(category.id).await?;

    let question = {
        let mut rng = rand::thread_rng();
        next_question(&pool, category.id, &previous, &mut rng).cloned()
    };

    if question.is_none() {
        tracing::debug!(
            "Quiz over for category {} ({}) after {} questions",
            category.id,
            category.kind.as_deref().unwrap_or("all"),
            previous.len()
        );
    }

    success(QuizPayload { question })
}
