//! OAuth Use Case
//!
//! Social login: hand out the provider's hosted authorization URL, then
//! exchange the code that comes back on the callback for a session.

use std::sync::Arc;

use crate::application::session_codec::{SessionCodec, SessionGrant};
use crate::domain::identity::IdentityProvider;
use crate::domain::value_object::oauth_provider::OAuthProvider;
use crate::error::{AuthError, AuthResult};

/// Shown when the provider gives no usable reason
pub const OAUTH_FAILED: &str = "OAuth authentication failed";

/// OAuth use case
pub struct OAuthUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    codec: Arc<SessionCodec>,
}

impl<P> OAuthUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, codec: Arc<SessionCodec>) -> Self {
        Self { provider, codec }
    }

    /// Authorization URL for a provider identifier such as `GoogleOAuth`
    pub fn authorization_url(&self, provider: &str) -> AuthResult<String> {
        let provider: OAuthProvider = provider.parse()?;
        let url = self.provider.authorization_url(provider)?;

        tracing::debug!(provider = %provider, "Issued OAuth authorization URL");
        Ok(url)
    }

    /// Exchange the callback code; a missing or blank code never reaches the provider
    pub async fn handle_callback(&self, code: Option<&str>) -> AuthResult<SessionGrant> {
        let code = code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingAuthorizationCode)?;

        let user = self.provider.authenticate_with_code(code).await?;
        let grant = self.codec.grant(user)?;

        tracing::info!(user_id = %grant.user.id, "User signed in via OAuth");
        Ok(grant)
    }
}
