// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the recipe API.
//!
//! ## Auth Flow
//!
//! 1. Client signs in with Google or Facebook and exchanges the provider
//!    token at `POST /v1/auth/{provider}` for a server-issued JWT
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. For routes tagged with the configured route tag, the auth filter:
//!    - Verifies the HS256 signature, issuer and expiry
//!    - Attaches a [`VerifiedJwt`] to the request extensions
//!    - Otherwise answers 403 with `ERR_AUTHORIZATION_HEADER` or
//!      `ERR_INVALID_SIGNATURE_OR_CLAIM`
//!
//! ## Security
//!
//! - Verification failures are not distinguished on the wire
//! - No server-side session state; tokens are never stored

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod social;

pub use claims::{get_verified_jwt, has_verified_jwt, VerifiedJwt};
pub use error::{AuthError, TokenIssueError, VerificationError};
pub use extractor::{Auth, OptionalAuth};
pub use jwt::JwtCenter;
pub use middleware::{auth_middleware, AuthFilter, FilterDecision};
pub use routes::{RouteMetadata, RouteTags};
pub use social::{
    FacebookTokenVerifier, GoogleTokenVerifier, SocialAuthError, SocialProvider,
    SocialTokenVerifier, VerifiedUserInfo, VerifyFuture,
};
