//! Auth Middleware
//!
//! Middleware for requiring a session on protected routes.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::{AuthConfig, GetSessionUseCase, SessionCodec};
use crate::presentation::dto::AuthResponse;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub codec: Arc<SessionCodec>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid session cookie
///
/// On success the verified [`SessionUser`](crate::domain::SessionUser) is
/// inserted into the request extensions.
pub async fn require_session(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let use_case = GetSessionUseCase::new(state.codec.clone(), state.config.clone());

    let Some(user) = use_case.execute(req.headers()) else {
        return (
            StatusCode::UNAUTHORIZED,
            [("X-Auth-Required", "true")],
            Json(AuthResponse::failure("Authentication required")),
        )
            .into_response();
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
