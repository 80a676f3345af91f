// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Every request is classified independently:
//!
//! - route not tagged → forwarded unchanged
//! - tagged, header missing or without the bearer marker → 403 `ERR_AUTHORIZATION_HEADER`
//! - tagged, token fails verification → 403 `ERR_INVALID_SIGNATURE_OR_CLAIM`
//! - tagged, token verified → [`VerifiedJwt`] inserted into the request
//!   extensions, then forwarded
//!
//! ## Usage
//!
//! ```rust,ignore
//! let filter = AuthFilter::new(settings, jwt, Arc::new(tags));
//!
//! let app = Router::new()
//!     .route("/v1/users/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(filter, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::routes::RouteMetadata;
use super::{AuthError, JwtCenter, VerifiedJwt};
use crate::config::AuthSettings;

/// Outcome of inspecting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Route is not protected
    Passthrough,
    /// Route is protected and the token verified
    Authenticated(VerifiedJwt),
    /// Route is protected and the request must be answered with this error
    Rejected(AuthError),
}

/// Bearer-token filter for tagged routes.
#[derive(Clone)]
pub struct AuthFilter {
    settings: Arc<AuthSettings>,
    jwt: Arc<JwtCenter>,
    routes: Arc<dyn RouteMetadata>,
}

impl AuthFilter {
    pub fn new(
        settings: Arc<AuthSettings>,
        jwt: Arc<JwtCenter>,
        routes: Arc<dyn RouteMetadata>,
    ) -> Self {
        Self {
            settings,
            jwt,
            routes,
        }
    }

    /// Classify `request` without forwarding it.
    pub fn decide(&self, request: &Request) -> FilterDecision {
        if !self.routes.has_tag(request, &self.settings.route_tag) {
            return FilterDecision::Passthrough;
        }

        let Some(token) = self.bearer_token(request) else {
            tracing::error!(
                method = %request.method(),
                path = %request.uri().path(),
                "Authorization header missing or malformed on protected route"
            );
            return FilterDecision::Rejected(AuthError::MissingAuthHeader);
        };

        match self.jwt.verify(token) {
            Ok(verified) => FilterDecision::Authenticated(verified),
            Err(e) => {
                tracing::debug!(path = %request.uri().path(), "Bearer token rejected");
                FilterDecision::Rejected(e.into())
            }
        }
    }

    /// Run the filter and, unless it rejects, the rest of the chain.
    pub async fn handle(&self, mut request: Request, next: Next) -> Response {
        match self.decide(&request) {
            FilterDecision::Passthrough => next.run(request).await,
            FilterDecision::Authenticated(verified) => {
                request.extensions_mut().insert(verified);
                next.run(request).await
            }
            FilterDecision::Rejected(e) => e.into_response(),
        }
    }

    fn bearer_token<'r>(&self, request: &'r Request) -> Option<&'r str> {
        request
            .headers()
            .get(&self.settings.header_name)?
            .to_str()
            .ok()?
            .strip_prefix(self.settings.bearer_prefix.as_str())
    }
}

/// Authentication middleware function.
pub async fn auth_middleware(
    State(filter): State<AuthFilter>,
    request: Request,
    next: Next,
) -> Response {
    filter.handle(request, next).await
}
