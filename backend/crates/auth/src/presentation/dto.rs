//! API DTOs (Data Transfer Objects)

use kernel::validation::FieldErrors;
use serde::{Deserialize, Serialize};

use crate::application::{LoginInput, RegisterInput};
use crate::domain::entity::session_user::SessionUser;

// ============================================================================
// Requests
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty so they surface as field errors.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Login request
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        LoginInput {
            email: req.email,
            password: req.password,
        }
    }
}

/// `GET /oauth/url` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthUrlQuery {
    #[serde(default)]
    pub provider: String,
}

/// OAuth callback (query string or JSON body)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub code: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Uniform result body for every gateway operation except `getSession`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn with_user(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            ..Self::ok()
        }
    }

    pub fn with_url(url: String) -> Self {
        Self {
            url: Some(url),
            ..Self::ok()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_field_errors(mut self, field_errors: Option<FieldErrors>) -> Self {
        self.field_errors = field_errors;
        self
    }
}

/// `getSession` body: the user, or `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}
