//! Drink API endpoints.
//!
//! Reading the short menu is public; everything else requires a permission.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult, AppJson, AppPath};
use crate::auth::{Authorized, DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks};
use crate::errors::AppError;
use crate::models::{CreateDrinkRequest, LongDrink, ShortDrink, UpdateDrinkRequest};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DrinksPayload<T: Serialize> {
    pub drinks: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct DrinkDeletedPayload {
    pub delete: i64,
}

/// GET /drinks - Public menu with short recipes.
pub async fn list_drinks(State(state): State<AppState>) -> ApiResult<DrinksPayload<ShortDrink>> {
    let drinks = state.repo.list_drinks().await?;
    success(DrinksPayload {
        drinks: drinks.iter().map(|d| d.short()).collect(),
    })
}

/// GET /drinks-detail - Menu with full recipes.
pub async fn drinks_detail(
    _auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> ApiResult<DrinksPayload<LongDrink>> {
    let drinks = state.repo.list_drinks().await?;
    success(DrinksPayload {
        drinks: drinks.iter().map(|d| d.long()).collect(),
    })
}

/// POST /drinks - Add a drink with a title not already on the menu.
pub async fn create_drink(
    Authorized { permissions, .. }: Authorized<PostDrinks>,
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDrinkRequest>,
) -> ApiResult<DrinksPayload<LongDrink>> {
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Drink title is required".to_string()))?;
    let recipe = request
        .recipe
        .filter(|r| !r.is_null())
        .ok_or_else(|| AppError::BadRequest("Drink recipe is required".to_string()))?;

    // Not atomic with the insert
    if state.repo.find_drink_by_title(&title).await?.is_some() {
        return Err(AppError::DuplicateTitle(title));
    }

    let drink = state.repo.create_drink(&title, &recipe).await?;
    tracing::info!(
        subject = permissions.subject.as_deref().unwrap_or("-"),
        "Created drink {} ({})",
        drink.id,
        drink.title
    );

    success(DrinksPayload {
        drinks: vec![drink.long()],
    })
}

/// PATCH /drinks/{id} - Change the title and/or recipe of a drink.
pub async fn update_drink(
    Authorized { permissions, .. }: Authorized<PatchDrinks>,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateDrinkRequest>,
) -> ApiResult<DrinksPayload<LongDrink>> {
    if request.title.is_none() && request.recipe.is_none() {
        return Err(AppError::BadRequest(
            "Nothing to update: send a title or a recipe".to_string(),
        ));
    }
    if request.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("Drink title cannot be blank".to_string()));
    }

    if state.repo.get_drink(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Drink {} not found", id)));
    }
    if let Some(title) = &request.title {
        if let Some(existing) = state.repo.find_drink_by_title(title).await? {
            if existing.id != id {
                return Err(AppError::DuplicateTitle(title.clone()));
            }
        }
    }

    let drink = state
        .repo
        .update_drink(id, request.title.as_deref(), request.recipe.as_ref())
        .await?;
    tracing::info!(
        subject = permissions.subject.as_deref().unwrap_or("-"),
        "Updated drink {}",
        id
    );

    success(DrinksPayload {
        drinks: vec![drink.long()],
    })
}

/// DELETE /drinks/{id} - Remove a drink from the menu.
pub async fn delete_drink(
    Authorized { permissions, .. }: Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<DrinkDeletedPayload> {
    state.repo.delete_drink(id).await?;
    tracing::info!(
        subject = permissions.subject.as_deref().unwrap_or("-"),
        "Deleted drink {}",
        id
    );

    success(DrinkDeletedPayload { delete: id })
}
