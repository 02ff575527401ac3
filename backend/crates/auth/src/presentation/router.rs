//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::{AuthConfig, SessionCodec};
use crate::domain::identity::IdentityProvider;
use crate::infra::workos::WorkOsClient;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_session};

/// Create the Auth router backed by WorkOS
pub fn auth_router(provider: WorkOsClient, codec: SessionCodec, config: AuthConfig) -> Router {
    auth_router_generic(provider, codec, config)
}

/// Create a generic Auth router for any identity provider implementation
pub fn auth_router_generic<P>(provider: P, codec: SessionCodec, config: AuthConfig) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let state = AuthAppState {
        provider: Arc::new(provider),
        codec: Arc::new(codec),
        config: Arc::new(config),
    };

    let middleware_state = AuthMiddlewareState {
        codec: state.codec.clone(),
        config: state.config.clone(),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(from_fn_with_state(middleware_state, require_session));

    Router::new()
        .route("/session", get(handlers::get_session::<P>))
        .route("/register", post(handlers::register::<P>))
        .route("/login", post(handlers::login::<P>))
        .route("/oauth/url", get(handlers::oauth_url::<P>))
        .route(
            "/callback",
            get(handlers::oauth_callback::<P>).post(handlers::oauth_callback_post::<P>),
        )
        .route("/signout", post(handlers::sign_out::<P>))
        .with_state(state)
        .merge(protected)
}
