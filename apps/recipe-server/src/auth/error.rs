// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Token verification failure.
///
/// Bad signature, expiry, wrong issuer and malformed structure all collapse
/// into the single case so callers cannot tell which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("token signature or claims are invalid")]
    InvalidSignatureOrClaim,
}

impl VerificationError {
    /// Wire name of the error case.
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidSignatureOrClaim => "ERR_INVALID_SIGNATURE_OR_CLAIM",
        }
    }
}

/// Token issuance failure.
#[derive(Debug, thiserror::Error)]
pub enum TokenIssueError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Rejection produced by the auth filter on a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Header absent, not valid text, or lacking the bearer marker
    #[error("authorization header is missing or malformed")]
    MissingAuthHeader,
    /// Token present but failed verification
    #[error(transparent)]
    InvalidCredential(#[from] VerificationError),
}

impl AuthError {
    /// Body string sent to the client.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "ERR_AUTHORIZATION_HEADER",
            AuthError::InvalidCredential(e) => e.error_code(),
        }
    }

    /// Every authentication failure maps to 403.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), self.error_code()).into_response()
    }
}
