// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use recipe_server::{
    api::router,
    auth::{FacebookTokenVerifier, GoogleTokenVerifier, JwtCenter},
    config::{LogFormat, ServerConfig},
    state::AppState,
    store::InMemoryStore,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Invalid configuration");
    init_tracing(config.log_format);

    let google = GoogleTokenVerifier::new(config.google_client_id.clone())
        .expect("Failed to create Google token verifier");
    let facebook = FacebookTokenVerifier::new().expect("Failed to create Facebook token verifier");

    let state = AppState::new(
        InMemoryStore::new(),
        JwtCenter::new(&config.jwt),
        config.auth.clone(),
    )
    .with_social_verifier(Arc::new(google))
    .with_social_verifier(Arc::new(facebook));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        %addr,
        issuer = %config.jwt.issuer,
        route_tag = %config.auth.route_tag,
        "Recipe server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
