//! Question API endpoints.

use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};

use super::{success, ApiResponse, ApiResult, AppJson, AppPath, AppQuery, QuestionListPayload};
use crate::errors::AppError;
use crate::models::{category_map, NewQuestion, Question, QuestionsPostRequest};
use crate::pagination::{paginate, QUESTIONS_PER_PAGE};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    pub page: Option<usize>,
    #[serde(rename = "currentCategory")]
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct QuestionPagePayload {
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: BTreeMap<i64, String>,
    pub current_category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedQuestionPayload {
    pub created: i64,
    pub question_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedPayload {
    pub deleted: i64,
}

/// GET /questions - One page of questions plus the category map.
pub async fn list_questions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<QuestionsQuery>,
) -> ApiResult<QuestionPagePayload> {
    let page = query.page.unwrap_or(1);

    let questions = state.repo.list_questions().await?;
    let page_items = paginate(&questions, page, QUESTIONS_PER_PAGE);
    if page_items.is_empty() {
        return Err(AppError::NotFound(format!("Page {} has no questions", page)));
    }

    let categories = category_map(&state.repo.list_categories().await?);
    let current_category = query
        .current_category
        .and_then(|id| categories.get(&id).cloned());

    success(QuestionPagePayload {
        questions: page_items.to_vec(),
        total_questions: state.repo.count_questions().await?,
        categories,
        current_category,
    })
}

/// POST /questions - Search when `searchTerm` is present, create otherwise.
pub async fn post_questions(
    State(state): State<AppState>,
    AppJson(request): AppJson<QuestionsPostRequest>,
) -> Result<Response, AppError> {
    if let Some(term) = request.search_term {
        let questions = state.repo.search_questions(&term).await?;
        tracing::debug!("Search {:?} matched {} questions", term, questions.len());

        return Ok(ApiResponse::new(QuestionListPayload {
            total_questions: questions.len(),
            questions,
            current_category: None,
        })
        .into_response());
    }

    let new = validate_new_question(request)?;
    let question = state.repo.create_question(&new).await?;
    tracing::info!("Created question {}", question.id);

    Ok(ApiResponse::new(CreatedQuestionPayload {
        created: question.id,
        question_id: question.id,
    })
    .into_response())
}

/// DELETE /questions/{id} - Delete a question.
pub async fn delete_question(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<DeletedPayload> {
    state.repo.delete_question(id).await?;
    tracing::info!("Deleted question {}", id);

    success(DeletedPayload { deleted: id })
}

fn validate_new_question(request: QuestionsPostRequest) -> Result<NewQuestion, AppError> {
    let question = request
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Question text is required".to_string()))?;
    let answer = request
        .answer
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Answer is required".to_string()))?;
    let category = request
        .category
        .ok_or_else(|| AppError::BadRequest("Category is required".to_string()))?;
    let difficulty = request
        .difficulty
        .ok_or_else(|| AppError::BadRequest("Difficulty is required".to_string()))?;

    Ok(NewQuestion {
        question,
        answer,
        category,
        difficulty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuestionsPostRequest {
        QuestionsPostRequest {
            question: Some("Who painted the Mona Lisa?".to_string()),
            answer: Some("Leonardo da Vinci".to_string()),
            category: Some(2),
            difficulty: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_complete_question() {
        let new = validate_new_question(request()).unwrap();
        assert_eq!(new.category, 2);
        assert_eq!(new.difficulty, 3);
    }

    #[test]
    fn test_validate_rejects_blank_answer() {
        let err = validate_new_question(QuestionsPostRequest {
            answer: Some("   ".to_string()),
            ..request()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_validate_rejects_missing_difficulty() {
        let err = validate_new_question(QuestionsPostRequest {
            difficulty: None,
            ..request()
        })
        .unwrap_err();
        assert_eq!(err.message(), "Difficulty is required");
    }
}
