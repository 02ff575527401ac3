//! Identity Provider Port
//!
//! Accounts and credentials live in a hosted user-management service. The
//! application layer talks to it only through this trait; the HTTP adapter is
//! in the infrastructure layer.

use platform::password::ClearTextPassword;

use crate::domain::entity::session_user::SessionUser;
use crate::domain::value_object::{email::Email, full_name::FullName, oauth_provider::OAuthProvider};
use crate::error::AuthResult;

/// Account to create at the identity provider
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub password: ClearTextPassword,
    pub name: FullName,
}

/// Identity provider trait
///
/// Tokens issued by the provider alongside the user record are not part of
/// this contract; implementations drop them.
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Create a new account
    async fn create_user(&self, new_user: &NewUser) -> AuthResult<SessionUser>;

    /// Authenticate with email and password
    async fn authenticate_with_password(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<SessionUser>;

    /// Hosted authorization URL for a social login
    fn authorization_url(&self, provider: OAuthProvider) -> AuthResult<String>;

    /// Exchange an authorization code from the OAuth callback
    async fn authenticate_with_code(&self, code: &str) -> AuthResult<SessionUser>;
}
