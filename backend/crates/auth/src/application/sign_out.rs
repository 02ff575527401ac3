//! Sign Out Use Case
//!
//! Sessions are stateless, so signing out only overwrites the cookie. The
//! token itself stays valid until it expires.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use platform::cookie::clear_cookie_header;

use crate::application::config::AuthConfig;
use crate::application::get_session::GetSessionUseCase;
use crate::application::session_codec::SessionCodec;

/// Sign out use case
pub struct SignOutUseCase {
    codec: Arc<SessionCodec>,
    config: Arc<AuthConfig>,
}

impl SignOutUseCase {
    pub fn new(codec: Arc<SessionCodec>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    /// Returns the `Set-Cookie` value that clears the session
    pub fn execute(&self, headers: &HeaderMap) -> HeaderValue {
        let current = GetSessionUseCase::new(self.codec.clone(), self.config.clone()).execute(headers);

        match current {
            Some(user) => tracing::info!(user_id = %user.id, "User signed out"),
            None => tracing::debug!("Sign out without a valid session"),
        }

        clear_cookie_header(&self.config.session_cookie())
    }
}
