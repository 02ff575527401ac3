//! WorkOS User Management Adapter
//!
//! Implements [`IdentityProvider`] over the WorkOS REST API:
//! - `POST /user_management/users`
//! - `POST /user_management/authenticate` (password and authorization code grants)
//! - `GET  /user_management/authorize` (hosted login, built locally)
//!
//! Access and refresh tokens returned by `authenticate` are not deserialized;
//! the portal keeps its own session token instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::entity::session_user::SessionUser;
use crate::domain::identity::{IdentityProvider, NewUser};
use crate::domain::value_object::{email::Email, oauth_provider::OAuthProvider};
use crate::error::{AuthError, AuthResult};
use platform::password::ClearTextPassword;

pub const DEFAULT_API_BASE_URL: &str = "https://api.workos.com";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/auth/callback";

/// WorkOS client configuration
///
/// Validated once at startup and immutable afterwards.
#[derive(Clone)]
pub struct WorkOsConfig {
    api_key: String,
    client_id: String,
    redirect_uri: Url,
    api_base_url: Url,
}

impl WorkOsConfig {
    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: &str,
    ) -> AuthResult<Self> {
        let api_key = api_key.into();
        let client_id = client_id.into();

        if api_key.trim().is_empty() {
            return Err(AuthError::Config("WorkOS API key is required".to_string()));
        }
        if client_id.trim().is_empty() {
            return Err(AuthError::Config("WorkOS client ID is required".to_string()));
        }

        Ok(Self {
            api_key,
            client_id,
            redirect_uri: parse_url("redirect URI", redirect_uri)?,
            api_base_url: parse_url("API base URL", DEFAULT_API_BASE_URL)?,
        })
    }

    /// Override the API base URL (self-hosted proxy, tests)
    pub fn with_api_base_url(mut self, api_base_url: &str) -> AuthResult<Self> {
        self.api_base_url = parse_url("API base URL", api_base_url)?;
        Ok(self)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }
}

impl fmt::Debug for WorkOsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkOsConfig")
            .field("api_key", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .finish()
    }
}

fn parse_url(what: &str, raw: &str) -> AuthResult<Url> {
    Url::parse(raw).map_err(|e| AuthError::Config(format!("invalid WorkOS {what} {raw:?}: {e}")))
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct WorkOsUser {
    id: String,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    profile_picture_url: Option<String>,
}

impl From<WorkOsUser> for SessionUser {
    fn from(user: WorkOsUser) -> Self {
        SessionUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_picture_url: user.profile_picture_url,
        }
    }
}

#[derive(Deserialize)]
struct AuthenticateResponse {
    user: WorkOsUser,
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
}

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(flatten)]
    grant: Grant<'a>,
}

#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum Grant<'a> {
    Password { email: &'a str, password: &'a str },
    AuthorizationCode { code: &'a str },
}

/// Error bodies come in two shapes: `{message, code, errors?}` from the
/// management endpoints and `{error, error_description}` from authenticate.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or_else(|| self.errors.into_iter().find_map(|detail| detail.message))
            .or(self.message)
    }
}

// ============================================================================
// Client
// ============================================================================

/// WorkOS User Management client
#[derive(Debug, Clone)]
pub struct WorkOsClient {
    config: WorkOsConfig,
    http: reqwest::Client,
}

impl WorkOsClient {
    pub fn new(config: WorkOsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &WorkOsConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    async fn authenticate(
        &self,
        grant: Grant<'_>,
        operation: &'static str,
    ) -> AuthResult<SessionUser> {
        let body = AuthenticateRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.api_key,
            grant,
        };

        let response = self
            .http
            .post(self.endpoint("user_management/authenticate"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response, operation).await?;
        let authenticated: AuthenticateResponse = response.json().await?;
        Ok(authenticated.user.into())
    }

    /// Checks HTTP response status; returns the response on success or the provider's reason
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> AuthResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .unwrap_or_default()
            .into_message();

        Err(AuthError::Provider {
            operation,
            status,
            message,
        })
    }
}

impl IdentityProvider for WorkOsClient {
    async fn create_user(&self, new_user: &NewUser) -> AuthResult<SessionUser> {
        let body = CreateUserRequest {
            email: new_user.email.as_str(),
            password: new_user.password.expose(),
            first_name: new_user.name.first_name(),
            last_name: new_user.name.last_name(),
        };

        let response = self
            .http
            .post(self.endpoint("user_management/users"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response, "create user").await?;
        let user: WorkOsUser = response.json().await?;
        Ok(user.into())
    }

    async fn authenticate_with_password(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<SessionUser> {
        let grant = Grant::Password {
            email: email.as_str(),
            password: password.expose(),
        };
        self.authenticate(grant, "password authentication").await
    }

    fn authorization_url(&self, provider: OAuthProvider) -> AuthResult<String> {
        let mut url = parse_url("authorize URL", &self.endpoint("user_management/authorize"))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("response_type", "code");

        Ok(url.into())
    }

    async fn authenticate_with_code(&self, code: &str) -> AuthResult<SessionUser> {
        self.authenticate(Grant::AuthorizationCode { code }, "code exchange")
            .await
    }
}
