//! Application Configuration
//!
//! Configuration for the Auth application layer, and the session cookie
//! built from it.

use std::time::Duration;

use platform::cookie::{self, CookieConfig};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Session lifetime (7 days); token expiry and cookie Max-Age both use it
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session lifetime
    pub session_ttl: Duration,
    /// Whether to add the Secure attribute
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            session_ttl: SESSION_TTL,
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Create config for production (Secure cookie)
    pub fn production() -> Self {
        Self {
            cookie_secure: true,
            ..Default::default()
        }
    }

    /// Cookie layout for the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs()),
        }
    }

    /// `Set-Cookie` value carrying a session token
    pub fn build_session_cookie(&self, token: &str) -> String {
        self.session_cookie().build_set_cookie(token)
    }

    /// `Set-Cookie` value clearing the session (always `Max-Age=0`)
    pub fn build_clear_session_cookie(&self) -> String {
        self.session_cookie().build_delete_cookie()
    }

    /// Session token from a raw `Cookie` header
    pub fn parse_session_cookie(&self, cookie_header: &str) -> Option<String> {
        cookie::parse_cookie(cookie_header, &self.session_cookie_name)
    }
}
