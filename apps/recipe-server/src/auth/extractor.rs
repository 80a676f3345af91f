// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the verified identity.
//!
//! Both read the slot the auth filter fills; neither verifies tokens itself.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is VerifiedJwt
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{get_verified_jwt, AuthError, VerifiedJwt};

/// Extractor for authenticated users.
///
/// Rejects with [`AuthError::MissingAuthHeader`] when the filter did not
/// authenticate the request, which only happens if the route was not tagged.
pub struct Auth(pub VerifiedJwt);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_verified_jwt(&parts.extensions)
            .map(Auth)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Optional authentication extractor.
///
/// Yields `None` instead of rejecting.
pub struct OptionalAuth(pub Option<VerifiedJwt>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(get_verified_jwt(&parts.extensions)))
    }
}
