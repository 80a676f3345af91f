// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified identity and its request-context slot.

use axum::http::Extensions;

/// Identity of a principal whose token passed verification.
///
/// Only [`JwtCenter::verify`](super::JwtCenter::verify) produces this value.
/// It lives in the request extensions for the lifetime of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerifiedJwt {
    user_id: i64,
}

impl VerifiedJwt {
    pub(crate) fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// Subject id carried by the token.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

/// Read the verified identity attached by the auth filter.
///
/// Returns `Some` if and only if the request went through the authenticated
/// branch of the filter.
pub fn get_verified_jwt(extensions: &Extensions) -> Option<VerifiedJwt> {
    extensions.get::<VerifiedJwt>().copied()
}

/// Whether the auth filter attached a verified identity to this request.
pub fn has_verified_jwt(extensions: &Extensions) -> bool {
    extensions.get::<VerifiedJwt>().is_some()
}
