// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token creation and verification (HS256).
//!
//! Tokens carry three claims: `iss`, the configured subject-id claim and
//! `exp`. `iat` is written for diagnostics but never checked.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use super::claims::VerifiedJwt;
use super::error::{TokenIssueError, VerificationError};
use crate::config::JwtSettings;

type Claims = Map<String, Value>;

/// Signs and verifies bearer tokens with a shared secret.
///
/// Holds only configuration loaded at startup, so one instance is shared by
/// every request.
#[derive(Clone)]
pub struct JwtCenter {
    issuer: String,
    user_id_claim: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCenter {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            issuer: settings.issuer.clone(),
            user_id_claim: settings.user_id_claim.clone(),
            ttl: settings.ttl,
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
        }
    }

    /// Default time-to-live of created tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a token for `user_id` that expires after the default TTL.
    pub fn create(&self, user_id: i64) -> Result<String, TokenIssueError> {
        self.create_with_ttl(user_id, self.ttl)
    }

    /// Create a token for `user_id` that expires `ttl` from now.
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn create_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String, TokenIssueError> {
        self.create_at(user_id, Utc::now(), ttl)
    }

    fn create_at(
        &self,
        user_id: i64,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenIssueError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenIssueError::ExpiryOutOfRange)?;

        let mut claims = Claims::new();
        claims.insert("iss".to_string(), Value::from(self.issuer.as_str()));
        claims.insert(self.user_id_claim.clone(), Value::from(user_id));
        claims.insert("iat".to_string(), Value::from(issued_at.timestamp()));
        claims.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<VerifiedJwt, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`.
    ///
    /// Checks the signature, the issuer, and that `now` is strictly before
    /// `exp`. Any failure is reported as the same error.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedJwt, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // Expiry is compared against `now` below.
        validation.validate_exp = false;
        validation.validate_aud = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| VerificationError::InvalidSignatureOrClaim)?
            .claims;

        let expires_at = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(VerificationError::InvalidSignatureOrClaim)?;
        if now.timestamp() >= expires_at {
            return Err(VerificationError::InvalidSignatureOrClaim);
        }

        let user_id = claims
            .get(&self.user_id_claim)
            .and_then(Value::as_i64)
            .ok_or(VerificationError::InvalidSignatureOrClaim)?;

        Ok(VerifiedJwt::new(user_id))
    }
}
