//! HTTP Handlers
//!
//! One handler per gateway operation. Each catches its use case's error and
//! renders it with an operation-specific fallback message, so nothing past
//! this layer sees a raw failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use platform::cookie::set_cookie_header;

use crate::application::login::LOGIN_FAILED;
use crate::application::oauth::OAUTH_FAILED;
use crate::application::register::REGISTRATION_FAILED;
use crate::application::{
    AuthConfig, GetSessionUseCase, LoginUseCase, OAuthUseCase, RegisterUseCase, SessionCodec,
    SessionGrant, SignOutUseCase,
};
use crate::domain::entity::session_user::SessionUser;
use crate::domain::identity::IdentityProvider;
use crate::presentation::dto::{
    AuthResponse, CallbackRequest, LoginRequest, OAuthUrlQuery, RegisterRequest, SessionResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub provider: Arc<P>,
    pub codec: Arc<SessionCodec>,
    pub config: Arc<AuthConfig>,
}

impl<P> Clone for AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            codec: self.codec.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
pub async fn get_session<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
) -> Json<SessionResponse>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = GetSessionUseCase::new(state.codec.clone(), state.config.clone());

    Json(SessionResponse {
        user: use_case.execute(&headers),
    })
}

/// GET /api/auth/me (behind `require_session`)
pub async fn me(Extension(user): Extension<SessionUser>) -> Json<AuthResponse> {
    Json(AuthResponse::with_user(user))
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<P>(
    State(state): State<AuthAppState<P>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    let use_case = RegisterUseCase::new(state.provider.clone(), state.codec.clone());

    match use_case.execute(req.into()).await {
        Ok(grant) => issue_session(&state.config, grant),
        Err(e) => e.into_response_with(REGISTRATION_FAILED),
    }
}

/// POST /api/auth/login
pub async fn login<P>(
    State(state): State<AuthAppState<P>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    let use_case = LoginUseCase::new(state.provider.clone(), state.codec.clone());

    match use_case.execute(req.into()).await {
        Ok(grant) => issue_session(&state.config, grant),
        Err(e) => e.into_response_with(LOGIN_FAILED),
    }
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /api/auth/oauth/url?provider=GoogleOAuth
pub async fn oauth_url<P>(
    State(state): State<AuthAppState<P>>,
    Query(query): Query<OAuthUrlQuery>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = OAuthUseCase::new(state.provider.clone(), state.codec.clone());

    match use_case.authorization_url(&query.provider) {
        Ok(url) => Json(AuthResponse::with_url(url)).into_response(),
        Err(e) => e.into_response_with(OAUTH_FAILED),
    }
}

/// GET /api/auth/callback?code=...
pub async fn oauth_callback<P>(
    State(state): State<AuthAppState<P>>,
    Query(req): Query<CallbackRequest>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    exchange_code(&state, req).await
}

/// POST /api/auth/callback `{ "code": "..." }`
pub async fn oauth_callback_post<P>(
    State(state): State<AuthAppState<P>>,
    body: Result<Json<CallbackRequest>, JsonRejection>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    match body {
        Ok(Json(req)) => exchange_code(&state, req).await,
        Err(rejection) => invalid_body(rejection),
    }
}

async fn exchange_code<P>(state: &AuthAppState<P>, req: CallbackRequest) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = OAuthUseCase::new(state.provider.clone(), state.codec.clone());

    match use_case.handle_callback(req.code.as_deref()).await {
        Ok(grant) => issue_session(&state.config, grant),
        Err(e) => e.into_response_with(OAUTH_FAILED),
    }
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<P>(State(state): State<AuthAppState<P>>, headers: HeaderMap) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.codec.clone(), state.config.clone());
    let cookie = use_case.execute(&headers);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::ok()),
    )
        .into_response()
}

// ============================================================================
// Helper Functions
// ============================================================================

fn issue_session(config: &AuthConfig, grant: SessionGrant) -> Response {
    let cookie = set_cookie_header(&config.session_cookie(), &grant.token);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::with_user(grant.user)),
    )
        .into_response()
}

fn invalid_body(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "Rejected auth request body");

    (
        rejection.status(),
        Json(AuthResponse::failure("Invalid request body")),
    )
        .into_response()
}
