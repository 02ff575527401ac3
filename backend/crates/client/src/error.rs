//! Client Error Types

use thiserror::Error;

/// Result type for auth API calls
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure to talk to the auth API at all
///
/// Rejections by the API (bad credentials, validation) are not errors here;
/// they arrive as `{ success: false, ... }` bodies.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Auth API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from auth API (status {status})")]
    UnexpectedResponse { status: u16 },

    #[error("Invalid auth API base URL: {0}")]
    InvalidBaseUrl(String),
}
