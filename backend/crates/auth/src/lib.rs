//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session user, value objects, identity provider port
//! - `application/` - Use cases, session codec, configuration
//! - `infra/` - WorkOS User Management adapter
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration and login with email + password
//! - Social login (Google, GitHub, Microsoft, Apple) via hosted OAuth
//! - Stateless sessions: HS256-signed token in an HttpOnly cookie
//!
//! ## Security Model
//! - Credentials are verified by the identity provider, never stored here
//! - Session tokens expire after 7 days; there is no revocation list
//! - Token verification fails closed (treated as "no session")

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_codec::SessionCodec;
pub use domain::{IdentityProvider, NewUser, SessionUser};
pub use error::{AuthError, AuthResult};
pub use infra::workos::{WorkOsClient, WorkOsConfig};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
