// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for recipes and users.
//!
//! Ids are assigned sequentially starting at 1.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::auth::VerifiedUserInfo;
use crate::error::ApiError;
use crate::models::{CreateRecipeRequest, Recipe, User};

#[derive(Default)]
pub struct InMemoryStore {
    recipes: BTreeMap<i64, Recipe>,
    users: BTreeMap<i64, User>,
    next_recipe_id: i64,
    next_user_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_recipes(&self) -> Vec<Recipe> {
        self.recipes.values().cloned().collect()
    }

    pub fn recipe(&self, recipe_id: i64) -> Result<Recipe, ApiError> {
        self.recipes
            .get(&recipe_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Recipe not found"))
    }

    pub fn create_recipe(
        &mut self,
        owner_id: i64,
        request: CreateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(ApiError::unprocessable("Recipe title must not be empty"));
        }
        if request.ingredients.iter().any(|i| i.name.trim().is_empty()) {
            return Err(ApiError::unprocessable("Ingredient name must not be empty"));
        }

        self.next_recipe_id += 1;
        let recipe = Recipe {
            id: self.next_recipe_id,
            owner_id,
            title: title.to_string(),
            description: request.description,
            ingredients: request.ingredients,
            created_at: Utc::now(),
        };
        self.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    pub fn user(&self, user_id: i64) -> Option<User> {
        self.users.get(&user_id).cloned()
    }

    /// Return the user linked to this social identity, creating it on first
    /// login. Profile fields are refreshed from the provider on every call.
    pub fn upsert_social_user(&mut self, info: &VerifiedUserInfo) -> User {
        let existing = self
            .users
            .values_mut()
            .find(|u| u.provider == info.provider() && u.social_id == info.social_id());

        if let Some(user) = existing {
            user.full_name = info.full_name().to_string();
            user.email = info.email().to_string();
            user.picture = info.picture().map(str::to_string);
            return user.clone();
        }

        self.next_user_id += 1;
        let user = User {
            id: self.next_user_id,
            full_name: info.full_name().to_string(),
            email: info.email().to_string(),
            picture: info.picture().map(str::to_string),
            provider: info.provider(),
            social_id: info.social_id().to_string(),
        };
        self.users.insert(user.id, user.clone());
        user
    }
}
