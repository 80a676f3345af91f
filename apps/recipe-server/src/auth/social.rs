// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social login token verification (Google, Facebook).
//!
//! The client obtains a token from the provider and hands it to us; we ask
//! the provider who it belongs to.
//!
//! - Google: ID token checked against the `tokeninfo` endpoint, audience
//!   compared with `GOOGLE_CLIENT_ID` when configured
//! - Facebook: access token used to read `/me` from the Graph API

use std::{future::Future, pin::Pin, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

const DEFAULT_GOOGLE_BASE_URL: &str = "https://oauth2.googleapis.com";
const DEFAULT_FACEBOOK_BASE_URL: &str = "https://graph.facebook.com";
const FACEBOOK_FIELDS: &str = "id,name,email,picture";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    /// Parse provider from a path segment (case-insensitive).
    pub fn from_str(s: &str) -> Option<SocialProvider> {
        match s.to_lowercase().as_str() {
            "google" => Some(SocialProvider::Google),
            "facebook" => Some(SocialProvider::Facebook),
            _ => None,
        }
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocialProvider::Google => write!(f, "google"),
            SocialProvider::Facebook => write!(f, "facebook"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleUserInfo {
    pub full_name: String,
    pub email: String,
    /// Google `sub`
    pub social_id: String,
    pub picture: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacebookUserInfo {
    pub full_name: String,
    pub email: String,
    /// App-scoped Facebook user id
    pub social_id: String,
    pub picture: Option<String>,
}

/// User profile confirmed by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiedUserInfo {
    Google(GoogleUserInfo),
    Facebook(FacebookUserInfo),
}

impl VerifiedUserInfo {
    pub fn provider(&self) -> SocialProvider {
        match self {
            VerifiedUserInfo::Google(_) => SocialProvider::Google,
            VerifiedUserInfo::Facebook(_) => SocialProvider::Facebook,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            VerifiedUserInfo::Google(info) => &info.full_name,
            VerifiedUserInfo::Facebook(info) => &info.full_name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            VerifiedUserInfo::Google(info) => &info.email,
            VerifiedUserInfo::Facebook(info) => &info.email,
        }
    }

    pub fn social_id(&self) -> &str {
        match self {
            VerifiedUserInfo::Google(info) => &info.social_id,
            VerifiedUserInfo::Facebook(info) => &info.social_id,
        }
    }

    pub fn picture(&self) -> Option<&str> {
        match self {
            VerifiedUserInfo::Google(info) => info.picture.as_deref(),
            VerifiedUserInfo::Facebook(info) => info.picture.as_deref(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SocialAuthError {
    #[error("identity provider request failed: {0}")]
    Request(String),

    #[error("identity provider rejected the token: {0}")]
    Rejected(String),

    #[error("identity provider response was invalid: {0}")]
    InvalidResponse(String),

    #[error("token was issued for another client")]
    AudienceMismatch,
}

pub type VerifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<VerifiedUserInfo, SocialAuthError>> + Send + 'a>>;

/// Verifies a provider token and returns the profile it belongs to.
pub trait SocialTokenVerifier: Send + Sync {
    fn provider(&self) -> SocialProvider;

    fn verify<'a>(&'a self, token: &'a str) -> VerifyFuture<'a>;
}

fn http_client() -> Result<Client, SocialAuthError> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| SocialAuthError::Request(format!("failed to build HTTP client: {e}")))
}

async fn get_json<T: serde::de::DeserializeOwned>(
    http: &Client,
    url: Url,
) -> Result<T, SocialAuthError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| SocialAuthError::Request(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SocialAuthError::Rejected(format!("{status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| SocialAuthError::InvalidResponse(e.to_string()))
}

fn endpoint(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, SocialAuthError> {
    Url::parse_with_params(&format!("{}{path}", base_url.trim_end_matches('/')), params)
        .map_err(|e| SocialAuthError::Request(format!("invalid provider URL: {e}")))
}

// =============================================================================
// Google
// =============================================================================

/// Body returned by Google's `tokeninfo` endpoint.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    sub: String,
    #[serde(default)]
    aud: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// Sent as the string `"true"` or `"false"`
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleTokenInfo {
    fn into_user_info(self, client_id: Option<&str>) -> Result<GoogleUserInfo, SocialAuthError> {
        if let Some(expected) = client_id {
            if self.aud.as_deref() != Some(expected) {
                return Err(SocialAuthError::AudienceMismatch);
            }
        }
        let email = self
            .email
            .ok_or_else(|| SocialAuthError::InvalidResponse("missing email".to_string()))?;

        Ok(GoogleUserInfo {
            full_name: self.name.unwrap_or_else(|| email.clone()),
            email,
            social_id: self.sub,
            picture: self.picture,
            email_verified: self.email_verified.as_deref() == Some("true"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GoogleTokenVerifier {
    base_url: String,
    client_id: Option<String>,
    http: Client,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: Option<String>) -> Result<Self, SocialAuthError> {
        Ok(Self {
            base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
            client_id,
            http: http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl SocialTokenVerifier for GoogleTokenVerifier {
    fn provider(&self) -> SocialProvider {
        SocialProvider::Google
    }

    fn verify<'a>(&'a self, token: &'a str) -> VerifyFuture<'a> {
        Box::pin(async move {
            let url = endpoint(&self.base_url, "/tokeninfo", &[("id_token", token)])?;
            let info: GoogleTokenInfo = get_json(&self.http, url).await?;
            info.into_user_info(self.client_id.as_deref())
                .map(VerifiedUserInfo::Google)
        })
    }
}

// =============================================================================
// Facebook
// =============================================================================

#[derive(Debug, Deserialize)]
struct FacebookProfile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    #[serde(default)]
    url: Option<String>,
}

impl FacebookProfile {
    fn into_user_info(self) -> Result<FacebookUserInfo, SocialAuthError> {
        let email = self.email.ok_or_else(|| {
            SocialAuthError::InvalidResponse("email permission not granted".to_string())
        })?;

        Ok(FacebookUserInfo {
            full_name: self.name.unwrap_or_else(|| email.clone()),
            email,
            social_id: self.id,
            picture: self.picture.and_then(|p| p.data.url),
        })
    }
}

#[derive(Debug, Clone)]
pub struct FacebookTokenVerifier {
    base_url: String,
    http: Client,
}

impl FacebookTokenVerifier {
    pub fn new() -> Result<Self, SocialAuthError> {
        Ok(Self {
            base_url: DEFAULT_FACEBOOK_BASE_URL.to_string(),
            http: http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl SocialTokenVerifier for FacebookTokenVerifier {
    fn provider(&self) -> SocialProvider {
        SocialProvider::Facebook
    }

    fn verify<'a>(&'a self, token: &'a str) -> VerifyFuture<'a> {
        Box::pin(async move {
            let url = endpoint(
                &self.base_url,
                "/me",
                &[("fields", FACEBOOK_FIELDS), ("access_token", token)],
            )?;
            let profile: FacebookProfile = get_json(&self.http, url).await?;
            profile.into_user_info().map(VerifiedUserInfo::Facebook)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(SocialProvider::from_str("google"), Some(SocialProvider::Google));
        assert_eq!(SocialProvider::from_str("Facebook"), Some(SocialProvider::Facebook));
        assert_eq!(SocialProvider::from_str("github"), None);
        assert_eq!(SocialProvider::Google.to_string(), "google");
    }

    #[test]
    fn google_token_info_maps_to_user_info() {
        let info: GoogleTokenInfo = serde_json::from_str(
            r#"{"sub":"1098","aud":"client-1","email":"cook@example.com",
                "email_verified":"true","name":"Home Cook","picture":"https://img/p.png"}"#,
        )
        .unwrap();

        let user = info.into_user_info(Some("client-1")).unwrap();
        assert_eq!(user.social_id, "1098");
        assert_eq!(user.full_name, "Home Cook");
        assert_eq!(user.email, "cook@example.com");
        assert_eq!(user.picture.as_deref(), Some("https://img/p.png"));
        assert!(user.email_verified);
    }

    #[test]
    fn google_audience_must_match_when_configured() {
        let info: GoogleTokenInfo =
            serde_json::from_str(r#"{"sub":"1","aud":"other","email":"a@b.c"}"#).unwrap();
        assert!(matches!(
            info.into_user_info(Some("client-1")),
            Err(SocialAuthError::AudienceMismatch)
        ));

        let info: GoogleTokenInfo =
            serde_json::from_str(r#"{"sub":"1","aud":"other","email":"a@b.c"}"#).unwrap();
        let user = info.into_user_info(None).unwrap();
        assert_eq!(user.full_name, "a@b.c");
        assert!(!user.email_verified);
    }

    #[test]
    fn facebook_profile_maps_to_user_info() {
        let profile: FacebookProfile = serde_json::from_str(
            r#"{"id":"55","name":"Chef","email":"chef@example.com",
                "picture":{"data":{"url":"https://fb/p.jpg"}}}"#,
        )
        .unwrap();

        let user = VerifiedUserInfo::Facebook(profile.into_user_info().unwrap());
        assert_eq!(user.provider(), SocialProvider::Facebook);
        assert_eq!(user.social_id(), "55");
        assert_eq!(user.full_name(), "Chef");
        assert_eq!(user.email(), "chef@example.com");
        assert_eq!(user.picture(), Some("https://fb/p.jpg"));
    }

    #[test]
    fn facebook_profile_without_email_is_rejected() {
        let profile: FacebookProfile = serde_json::from_str(r#"{"id":"55"}"#).unwrap();
        assert!(matches!(
            profile.into_user_info(),
            Err(SocialAuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn endpoint_encodes_token_as_query_parameter() {
        let url = endpoint("https://graph.example/", "/me", &[("access_token", "a&b")]).unwrap();
        assert_eq!(url.as_str(), "https://graph.example/me?access_token=a%26b");
    }
}
