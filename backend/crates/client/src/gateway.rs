//! Auth Gateway Client
//!
//! The browser-side view of the auth API. [`HttpAuthGateway`] keeps a cookie
//! jar so the `session` cookie set by register/login/callback is sent back on
//! later calls, the way a browser would.

use auth::SessionUser;
use auth::models::oauth_provider::OAuthProvider;
use auth::models::{AuthResponse, SessionResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Auth API operations used by pages and forms
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Current session user, if the cookie is valid
    async fn get_session(&self) -> GatewayResult<Option<SessionUser>>;

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> GatewayResult<AuthResponse>;

    async fn login(&self, email: &str, password: &str) -> GatewayResult<AuthResponse>;

    async fn oauth_url(&self, provider: OAuthProvider) -> GatewayResult<AuthResponse>;

    async fn oauth_callback(&self, code: &str) -> GatewayResult<AuthResponse>;

    async fn sign_out(&self) -> GatewayResult<()>;
}

#[derive(Serialize)]
struct RegisterPayload<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CallbackPayload<'a> {
    code: &'a str,
}

/// HTTP implementation against the `/api/auth` router
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpAuthGateway {
    /// `base_url` is where the auth router is mounted, e.g. `http://localhost:3000/api/auth`
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Decode a body regardless of status; the API uses the same shape for failures
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(status, error = %e, "Undecodable auth API response");
            GatewayError::UnexpectedResponse { status }
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> GatewayResult<AuthResponse> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::read(response).await
    }
}

impl AuthGateway for HttpAuthGateway {
    async fn get_session(&self) -> GatewayResult<Option<SessionUser>> {
        let response = self.http.get(self.endpoint("session")).send().await?;
        let session: SessionResponse = Self::read(response).await?;
        Ok(session.user)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> GatewayResult<AuthResponse> {
        self.post(
            "register",
            &RegisterPayload {
                name,
                email,
                password,
            },
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> GatewayResult<AuthResponse> {
        self.post("login", &LoginPayload { email, password }).await
    }

    async fn oauth_url(&self, provider: OAuthProvider) -> GatewayResult<AuthResponse> {
        let response = self
            .http
            .get(self.endpoint("oauth/url"))
            .query(&[("provider", provider.as_str())])
            .send()
            .await?;
        Self::read(response).await
    }

    async fn oauth_callback(&self, code: &str) -> GatewayResult<AuthResponse> {
        self.post("callback", &CallbackPayload { code }).await
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        let response = self.http.post(self.endpoint("signout")).send().await?;
        let _: AuthResponse = Self::read(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let gateway = HttpAuthGateway::new("http://localhost:3000/api/auth/").unwrap();
        assert_eq!(
            gateway.endpoint("session"),
            "http://localhost:3000/api/auth/session"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpAuthGateway::new("not a url"),
            Err(GatewayError::InvalidBaseUrl(_))
        ));
    }
}
