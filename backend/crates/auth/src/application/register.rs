//! Register Use Case
//!
//! Creates an account at the identity provider, then signs the new user in
//! with the same credentials and mints a session token.

use std::sync::Arc;

use kernel::validation::{FieldErrors, Validated};
use platform::password::ClearTextPassword;

use crate::application::session_codec::{SessionCodec, SessionGrant};
use crate::domain::identity::{IdentityProvider, NewUser};
use crate::domain::value_object::{email::Email, full_name::FullName};
use crate::error::AuthResult;

/// Shown when the provider gives no usable reason
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Register input (as submitted)
pub struct RegisterInput {
    /// Full name, split into first/last
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    /// Validate every field, collecting all failures
    pub fn validate(self) -> Validated<NewUser> {
        let mut errors = FieldErrors::new();

        let name = errors.check("name", FullName::parse(&self.name));
        let email = errors.check("email", Email::new(&self.email));
        let password = errors.check("password", ClearTextPassword::new(self.password));

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser {
                email,
                password,
                name,
            }),
            _ => Err(errors),
        }
    }
}

/// Register use case
pub struct RegisterUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    codec: Arc<SessionCodec>,
}

impl<P> RegisterUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, codec: Arc<SessionCodec>) -> Self {
        Self { provider, codec }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<SessionGrant> {
        let new_user = input.validate()?;

        // Create first, then authenticate; never concurrently
        let created = self.provider.create_user(&new_user).await?;
        tracing::debug!(user_id = %created.id, "Account created at identity provider");

        let user = self
            .provider
            .authenticate_with_password(&new_user.email, &new_user.password)
            .await?;

        let grant = self.codec.grant(user)?;

        tracing::info!(user_id = %grant.user.id, "User registered");
        Ok(grant)
    }
}
