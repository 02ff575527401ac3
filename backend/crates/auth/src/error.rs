//! Auth Error Types
//!
//! This module provides auth-specific error variants classified by the
//! shared `kernel::error::ErrorKind` vocabulary.
//!
//! Handlers never let a variant escape as a bare error page: every failure is
//! rendered in the same `{ success: false, error, fieldErrors? }` body the
//! success path uses, with the status code taken from [`ErrorKind`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::kind::ErrorKind;
use kernel::validation::FieldErrors;
use thiserror::Error;

use crate::domain::value_object::oauth_provider::UnsupportedProvider;
use crate::presentation::dto::AuthResponse;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message used when nothing more specific can be shown
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more input fields failed validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// OAuth callback reached without a code
    #[error("Authorization code is required")]
    MissingAuthorizationCode,

    /// Unknown social login connection
    #[error(transparent)]
    UnsupportedProvider(#[from] UnsupportedProvider),

    /// Identity provider answered with a non-success status
    #[error("{operation} rejected by identity provider ({status})")]
    Provider {
        operation: &'static str,
        status: u16,
        message: Option<String>,
    },

    /// Identity provider could not be reached or answered garbage
    #[error("Identity provider request failed: {0}")]
    ProviderTransport(#[from] reqwest::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::MissingAuthorizationCode
            | AuthError::UnsupportedProvider(_) => ErrorKind::BadRequest,
            AuthError::Provider { status, .. } => ErrorKind::from_upstream_status(*status),
            AuthError::ProviderTransport(e) if e.is_decode() => ErrorKind::BadGateway,
            AuthError::ProviderTransport(_) => ErrorKind::ServiceUnavailable,
            AuthError::Config(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Message safe to show to the user
    ///
    /// Provider messages are passed through; transport and internal details
    /// are replaced by `fallback`.
    pub fn public_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(_)
            | AuthError::MissingAuthorizationCode
            | AuthError::UnsupportedProvider(_) => self.to_string(),
            AuthError::Provider {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            AuthError::Provider { .. }
            | AuthError::ProviderTransport(_)
            | AuthError::Config(_)
            | AuthError::Internal(_) => fallback.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AuthError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Render the uniform failure body, using `fallback` for opaque failures
    pub fn into_response_with(self, fallback: &str) -> Response {
        self.log();

        let status = self.status_code();
        let body = AuthResponse::failure(self.public_message(fallback))
            .with_field_errors(self.field_errors().cloned());

        (status, Json(body)).into_response()
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Provider {
                operation,
                status,
                message,
            } => {
                tracing::warn!(
                    operation = *operation,
                    status = *status,
                    message = message.as_deref().unwrap_or(""),
                    "Identity provider rejected request"
                );
            }
            AuthError::ProviderTransport(e) => {
                tracing::error!(error = %e, "Identity provider request failed");
            }
            AuthError::Config(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Auth request rejected");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.into_response_with(GENERIC_FAILURE_MESSAGE)
    }
}

impl From<FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        AuthError::Validation(errors)
    }
}
