//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors use `kernel::error::app_error::AppError`.

mod config;

use anyhow::Context;
use auth::config::SESSION_TTL;
use auth::{AuthConfig, SessionCodec, WorkOsClient, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kernel::error::app_error::AppError;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ServerConfig {
        workos,
        jwt_secret,
        bind_addr,
        frontend_origins,
        auth,
    } = ServerConfig::from_env().context("failed to load configuration")?;

    let codec =
        SessionCodec::new(jwt_secret.as_bytes(), SESSION_TTL).context("invalid JWT_SECRET_KEY")?;

    tracing::info!(
        cookie_secure = auth.cookie_secure,
        origins = ?frontend_origins,
        "Auth configured"
    );

    let app = build_app(WorkOsClient::new(workos), codec, auth, &frontend_origins);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(
    workos: WorkOsClient,
    codec: SessionCodec,
    auth: AuthConfig,
    frontend_origins: &[String],
) -> Router {
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials are required for the session cookie to cross origins
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    Router::new()
        .nest("/api/auth", auth_router(workos, codec, auth))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn not_found() -> AppError {
    AppError::not_found("No such route")
}
