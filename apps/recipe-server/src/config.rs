// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup and is
//! immutable afterwards. Every request shares the same values through `Arc`.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_HEADER` | Header carrying the bearer credential | `Authorization` |
//! | `AUTH_BEARER_PREFIX` | Marker preceding the token in the header | `Bearer ` |
//! | `AUTH_ROUTE_TAG` | Tag marking routes that require authentication | `auth` |
//! | `JWT_ISSUER` | Issuer claim written into and expected from tokens | `recipe-server` |
//! | `JWT_USER_ID_CLAIM` | Claim key holding the subject id | `userId` |
//! | `JWT_SECRET` | HMAC-SHA256 signing secret | Required |
//! | `JWT_TTL_SECS` | Default token time-to-live in seconds | `86400` |
//! | `GOOGLE_CLIENT_ID` | Expected audience of Google ID tokens | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;

use axum::http::HeaderName;
use chrono::{Duration, Utc};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH_HEADER_ENV: &str = "AUTH_HEADER";
pub const AUTH_BEARER_PREFIX_ENV: &str = "AUTH_BEARER_PREFIX";
pub const AUTH_ROUTE_TAG_ENV: &str = "AUTH_ROUTE_TAG";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_USER_ID_CLAIM_ENV: &str = "JWT_USER_ID_CLAIM";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
pub const GOOGLE_CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BEARER_PREFIX: &str = "Bearer ";
/// Tag attached to routes that must pass through the auth filter.
pub const DEFAULT_ROUTE_TAG: &str = "auth";
pub const DEFAULT_ISSUER: &str = "recipe-server";
pub const DEFAULT_USER_ID_CLAIM: &str = "userId";
pub const DEFAULT_TTL_SECS: i64 = 86_400;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Settings consumed by the auth filter.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Header the bearer credential is read from
    pub header_name: HeaderName,
    /// Marker that must prefix the token inside the header value
    pub bearer_prefix: String,
    /// Route tag that switches the filter on for a route
    pub route_tag: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            header_name: axum::http::header::AUTHORIZATION,
            bearer_prefix: DEFAULT_BEARER_PREFIX.to_string(),
            route_tag: DEFAULT_ROUTE_TAG.to_string(),
        }
    }
}

/// Settings consumed by the JWT center.
#[derive(Clone)]
pub struct JwtSettings {
    pub issuer: String,
    pub user_id_claim: String,
    pub secret: Vec<u8>,
    pub ttl: Duration,
}

impl JwtSettings {
    /// Settings with default issuer, claim key and TTL around `secret`.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            user_id_claim: DEFAULT_USER_ID_CLAIM.to_string(),
            secret: secret.into(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        }
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("issuer", &self.issuer)
            .field("user_id_claim", &self.user_id_claim)
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthSettings,
    pub jwt: JwtSettings,
    pub google_client_id: Option<String>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |name: &str, default: &str| {
            optional(name).unwrap_or_else(|| default.to_string())
        };

        let port = match optional(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let header_name = match optional(AUTH_HEADER_ENV) {
            Some(raw) => HeaderName::from_str(&raw).map_err(|e| ConfigError::Invalid {
                name: AUTH_HEADER_ENV,
                reason: e.to_string(),
            })?,
            None => axum::http::header::AUTHORIZATION,
        };

        // The prefix keeps its trailing space, so it is not trimmed.
        let bearer_prefix = match lookup(AUTH_BEARER_PREFIX_ENV) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: AUTH_BEARER_PREFIX_ENV,
                    reason: "bearer prefix must not be empty".to_string(),
                })
            }
            Some(raw) => raw,
            None => DEFAULT_BEARER_PREFIX.to_string(),
        };

        let secret = optional(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let ttl = match optional(JWT_TTL_SECS_ENV) {
            Some(raw) => {
                let secs = raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                    name: JWT_TTL_SECS_ENV,
                    reason: e.to_string(),
                })?;
                Duration::try_seconds(secs)
                    .filter(|ttl| {
                        *ttl > Duration::zero() && Utc::now().checked_add_signed(*ttl).is_some()
                    })
                    .ok_or_else(|| ConfigError::Invalid {
                        name: JWT_TTL_SECS_ENV,
                        reason: format!("time-to-live must be positive and in range, got {secs}"),
                    })?
            }
            None => Duration::seconds(DEFAULT_TTL_SECS),
        };

        let log_format = match optional(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected 'json' or 'pretty', got '{other}'"),
                })
            }
        };

        Ok(Self {
            host: or_default(HOST_ENV, DEFAULT_HOST),
            port,
            auth: AuthSettings {
                header_name,
                bearer_prefix,
                route_tag: or_default(AUTH_ROUTE_TAG_ENV, DEFAULT_ROUTE_TAG),
            },
            jwt: JwtSettings {
                issuer: or_default(JWT_ISSUER_ENV, DEFAULT_ISSUER),
                user_id_claim: or_default(JWT_USER_ID_CLAIM_ENV, DEFAULT_USER_ID_CLAIM),
                secret: secret.into_bytes(),
                ttl,
            },
            google_client_id: optional(GOOGLE_CLIENT_ID_ENV),
            log_format,
        })
    }
}
