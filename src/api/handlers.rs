use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::mealplan::{self, MealPlanSuggestion};
use crate::shopping::{self, ShoppingItem, SuggestedRecipe};
use crate::suggest::{self, RecipeSummary};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShoppingSuggestionRequest {
    /// Accepted for contract compatibility; the aggregation itself only
    /// needs the recipes' missing-ingredient lists.
    #[serde(default)]
    pub inventory: Vec<String>,
    pub recipes: Vec<SuggestedRecipe>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingSuggestionResponse {
    pub shopping_list: Vec<ShoppingItem>,
}

#[derive(Debug, Deserialize)]
pub struct MealPlanSuggestionRequest {
    pub inventory: Vec<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Ingredient-based semantic recipe suggestions
pub async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    let dataset = state.dataset().ok_or(AppError::DatasetUnavailable)?;

    let summaries = suggest::suggest_recipes(
        &dataset.store,
        &dataset.embeddings,
        state.embedder(),
        &request.ingredients,
        request.course.as_deref(),
        request.diet.as_deref(),
    )
    .map_err(|err| {
        tracing::error!(error = %err, "suggestion request failed");
        AppError::Suggestion(err.to_string())
    })?;

    Ok(Json(summaries))
}

/// Shopping-list aggregation over previously suggested recipes
pub async fn shopping_suggestions(
    Json(request): Json<ShoppingSuggestionRequest>,
) -> Json<ShoppingSuggestionResponse> {
    let shopping_list = shopping::aggregate_shopping_list(&request.recipes);
    Json(ShoppingSuggestionResponse { shopping_list })
}

/// Per-course meal-plan suggestions
pub async fn mealplan_suggestions(
    State(state): State<AppState>,
    Json(request): Json<MealPlanSuggestionRequest>,
) -> AppResult<Json<Vec<MealPlanSuggestion>>> {
    let dataset = state.dataset().ok_or(AppError::DatasetUnavailable)?;

    let suggestions = mealplan::mealplan_suggestions(
        &dataset.store,
        &request.inventory,
        request.diet.as_deref(),
        request.course.as_deref(),
    );

    Ok(Json(suggestions))
}
