//! Category API endpoints.

use std::collections::BTreeMap;

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult, AppPath};
use crate::errors::AppError;
use crate::models::{category_map, Question};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesPayload {
    pub categories: BTreeMap<i64, String>,
}

/// Questions of one category; also the shape of a search response.
#[derive(Debug, Serialize)]
pub struct QuestionListPayload {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<String>,
}

/// GET /categories - List all categories as an id to name map.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<CategoriesPayload> {
    let categories = state.repo.list_categories().await?;

    success(CategoriesPayload {
        categories: category_map(&categories),
    })
}

/// GET /categories/{id}/questions - All questions of a category.
pub async fn category_questions(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<QuestionListPayload> {
    let category = state
        .repo
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

    let questions = state.repo.questions_in_category(category.id).await?;

    success(QuestionListPayload {
        total_questions: questions.len(),
        questions,
        current_category: Some(category.kind),
    })
}
