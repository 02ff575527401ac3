//! Get Session Use Case
//!
//! Resolves the session cookie on a request to the signed-in user, if any.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::config::AuthConfig;
use crate::application::session_codec::SessionCodec;
use crate::domain::entity::session_user::SessionUser;

/// Get session use case
pub struct GetSessionUseCase {
    codec: Arc<SessionCodec>,
    config: Arc<AuthConfig>,
}

impl GetSessionUseCase {
    pub fn new(codec: Arc<SessionCodec>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    /// Never fails: a missing, tampered or expired cookie is simply no session
    pub fn execute(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = platform::cookie::extract_cookie(headers, &self.config.session_cookie_name)?;
        self.codec.verify_token(&token)
    }
}
