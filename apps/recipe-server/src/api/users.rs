// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Auth;
use crate::models::User;
use crate::state::AppState;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Subject id from the verified token
    pub user_id: i64,
    /// Stored profile, absent if the subject has no local account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<User>,
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 403, description = "Missing or invalid bearer token"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Json<UserMeResponse> {
    let profile = state.store.read().await.user(user.user_id());
    Json(UserMeResponse {
        user_id: user.user_id(),
        profile,
    })
}
