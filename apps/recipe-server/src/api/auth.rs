// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social login endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::SocialProvider,
    error::ApiError,
    models::{LoginResponse, SocialLoginRequest},
    state::AppState,
};

/// Exchange an identity provider token for a server-issued bearer token.
///
/// The local account is created on first login and refreshed afterwards.
#[utoipa::path(
    post,
    path = "/v1/auth/{provider}",
    params(
        ("provider" = String, Path, description = "Identity provider: `google` or `facebook`")
    ),
    request_body = SocialLoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Empty provider token"),
        (status = 401, description = "Provider token could not be verified"),
        (status = 404, description = "Unknown or disabled provider"),
        (status = 502, description = "Identity provider unreachable")
    )
)]
pub async fn social_login(
    Path(provider): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SocialLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let provider = SocialProvider::from_str(&provider)
        .ok_or_else(|| ApiError::not_found("Unknown identity provider"))?;
    let verifier = state
        .social_verifier(provider)
        .ok_or_else(|| ApiError::not_found("Identity provider is not enabled"))?;

    if request.token.trim().is_empty() {
        return Err(ApiError::bad_request("Provider token is required"));
    }

    let info = verifier.verify(&request.token).await?;
    let user = state.store.write().await.upsert_social_user(&info);
    let token = state.jwt.create(user.id)?;

    tracing::info!(user_id = user.id, %provider, "User signed in");
    Ok(Json(LoginResponse { token, user }))
}
