// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recipe endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateRecipeRequest, Recipe},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/recipes",
    tag = "Recipes",
    responses((status = 200, body = [Recipe]))
)]
pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    let store = state.store.read().await;
    Json(store.list_recipes())
}

#[utoipa::path(
    get,
    path = "/v1/recipes/{recipe_id}",
    params(
        ("recipe_id" = i64, Path, description = "Identifier of the recipe")
    ),
    tag = "Recipes",
    responses(
        (status = 200, body = Recipe),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn get_recipe(
    Path(recipe_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Recipe>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.recipe(recipe_id)?))
}

/// Create a recipe owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/v1/recipes",
    request_body = CreateRecipeRequest,
    tag = "Recipes",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Recipe),
        (status = 403, description = "Missing or invalid bearer token"),
        (status = 422, description = "Invalid recipe")
    )
)]
pub async fn create_recipe(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let mut store = state.store.write().await;
    let recipe = store.create_recipe(user.user_id(), request)?;
    tracing::info!(recipe_id = recipe.id, owner_id = recipe.owner_id, "Recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}
