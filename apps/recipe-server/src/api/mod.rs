// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{
    http::Method,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_middleware, AuthFilter, RouteTags, SocialProvider},
    models::{CreateRecipeRequest, Ingredient, LoginResponse, Recipe, SocialLoginRequest, User},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod recipes;
pub mod users;

/// Routes that require a verified bearer token.
fn protected_routes(tag: &str) -> RouteTags {
    RouteTags::new()
        .tag(Method::POST, "/v1/recipes", tag)
        .tag(Method::GET, "/v1/users/me", tag)
}

pub fn router(state: AppState) -> Router {
    let filter = AuthFilter::new(
        state.auth_settings.clone(),
        state.jwt.clone(),
        Arc::new(protected_routes(&state.auth_settings.route_tag)),
    );

    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/v1/auth/{provider}", post(auth::social_login))
        .route(
            "/v1/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route("/v1/recipes/{recipe_id}", get(recipes::get_recipe))
        .route("/v1/users/me", get(users::get_current_user))
        .route_layer(from_fn_with_state(filter, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    paths(
        health::health,
        auth::social_login,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        users::get_current_user
    ),
    components(
        schemas(
            Recipe,
            Ingredient,
            CreateRecipeRequest,
            User,
            SocialProvider,
            SocialLoginRequest,
            LoginResponse,
            users::UserMeResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Social login and token issuance"),
        (name = "Recipes", description = "Recipe management"),
        (name = "Users", description = "Current user")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::social::GoogleUserInfo;
    use crate::auth::{
        SocialAuthError, SocialTokenVerifier, VerifiedUserInfo, VerifyFuture,
    };
    use crate::state::test_support::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Accepts exactly one provider token.
    struct StubGoogle {
        accepted: &'static str,
    }

    impl SocialTokenVerifier for StubGoogle {
        fn provider(&self) -> SocialProvider {
            SocialProvider::Google
        }

        fn verify<'a>(&'a self, token: &'a str) -> VerifyFuture<'a> {
            Box::pin(async move {
                if token != self.accepted {
                    return Err(SocialAuthError::Rejected("invalid token".to_string()));
                }
                Ok(VerifiedUserInfo::Google(GoogleUserInfo {
                    full_name: "Home Cook".to_string(),
                    email: "cook@example.com".to_string(),
                    social_id: "g-1".to_string(),
                    picture: None,
                    email_verified: true,
                }))
            })
        }
    }

    fn app() -> (Router, AppState) {
        let state =
            test_state().with_social_verifier(Arc::new(StubGoogle { accepted: "good-token" }));
        (router(state.clone()), state)
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn recipe_body() -> Value {
        json!({
            "title": "Shakshuka",
            "ingredients": [{ "name": "egg", "quantity": "4" }]
        })
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let (app, _) = app();
        let (status, body) = call(&app, Method::GET, "/v1/recipes", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");

        let (status, _) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_header_is_forbidden() {
        let (app, state) = app();
        let (status, body) =
            call(&app, Method::POST, "/v1/recipes", None, Some(recipe_body())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "ERR_AUTHORIZATION_HEADER");
        assert!(state.store.read().await.list_recipes().is_empty());
    }

    #[tokio::test]
    async fn protected_route_with_basic_scheme_is_forbidden() {
        let (app, _) = app();
        let (status, body) = call(
            &app,
            Method::GET,
            "/v1/users/me",
            Some("Basic xyz".to_string()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "ERR_AUTHORIZATION_HEADER");
    }

    #[tokio::test]
    async fn protected_route_with_expired_token_is_forbidden() {
        let (app, state) = app();
        let token = state.jwt.create_with_ttl(42, Duration::seconds(-10)).unwrap();
        let (status, body) = call(
            &app,
            Method::GET,
            "/v1/users/me",
            Some(format!("Bearer {token}")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "ERR_INVALID_SIGNATURE_OR_CLAIM");
    }

    #[tokio::test]
    async fn head_on_protected_get_route_is_authenticated() {
        let (app, state) = app();
        let token = state.jwt.create(42).unwrap();

        let (status, _) = call(
            &app,
            Method::HEAD,
            "/v1/users/me",
            Some(format!("Bearer {token}")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, Method::HEAD, "/v1/users/me", None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let expired = state.jwt.create_with_ttl(42, Duration::seconds(-10)).unwrap();
        let (status, _) = call(
            &app,
            Method::HEAD,
            "/v1/users/me",
            Some(format!("Bearer {expired}")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn valid_token_creates_recipe_for_subject() {
        let (app, state) = app();
        let token = state.jwt.create(42).unwrap();

        let (status, body) = call(
            &app,
            Method::POST,
            "/v1/recipes",
            Some(format!("Bearer {token}")),
            Some(recipe_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let recipe: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(recipe["owner_id"], 42);

        let (status, body) = call(&app, Method::GET, "/v1/recipes/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(fetched["title"], "Shakshuka");
    }

    #[tokio::test]
    async fn social_login_issues_usable_token() {
        let (app, _) = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/v1/auth/google",
            None,
            Some(json!({ "token": "good-token" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let login: Value = serde_json::from_str(&body).unwrap();
        let token = login["token"].as_str().unwrap().to_string();
        assert_eq!(login["user"]["email"], "cook@example.com");
        assert_eq!(login["user"]["provider"], "google");

        let (status, body) = call(
            &app,
            Method::GET,
            "/v1/users/me",
            Some(format!("Bearer {token}")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let me: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(me["user_id"], login["user"]["id"]);
        assert_eq!(me["profile"]["full_name"], "Home Cook");
    }

    #[tokio::test]
    async fn social_login_rejects_bad_provider_tokens() {
        let (app, _) = app();
        let (status, _) = call(
            &app,
            Method::POST,
            "/v1/auth/google",
            None,
            Some(json!({ "token": "forged" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            &app,
            Method::POST,
            "/v1/auth/google",
            None,
            Some(json!({ "token": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn social_login_unknown_or_disabled_provider_is_404() {
        let (app, _) = app();
        for uri in ["/v1/auth/github", "/v1/auth/facebook"] {
            let (status, _) = call(
                &app,
                Method::POST,
                uri,
                None,
                Some(json!({ "token": "good-token" })),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }
}
