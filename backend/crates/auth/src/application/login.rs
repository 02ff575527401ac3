//! Login Use Case
//!
//! Authenticates email + password at the identity provider and mints a
//! session token.

use std::sync::Arc;

use kernel::validation::{FieldErrors, Validated};
use platform::password::ClearTextPassword;

use crate::application::session_codec::{SessionCodec, SessionGrant};
use crate::domain::identity::IdentityProvider;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Shown when the provider gives no usable reason
pub const LOGIN_FAILED: &str = "Invalid credentials";

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Validated login credentials
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: ClearTextPassword,
}

impl LoginInput {
    pub fn validate(self) -> Validated<Credentials> {
        let mut errors = FieldErrors::new();

        let email = errors.check("email", Email::new(&self.email));
        let password = errors.check("password", ClearTextPassword::existing(self.password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(errors),
        }
    }
}

/// Login use case
pub struct LoginUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    codec: Arc<SessionCodec>,
}

impl<P> LoginUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, codec: Arc<SessionCodec>) -> Self {
        Self { provider, codec }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<SessionGrant> {
        let credentials = input.validate()?;

        let user = self
            .provider
            .authenticate_with_password(&credentials.email, &credentials.password)
            .await?;

        let grant = self.codec.grant(user)?;

        tracing::info!(user_id = %grant.user.id, "User signed in");
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_password() {
        let errors = LoginInput {
            email: "jane@biz.com".to_string(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_validate_accepts_legacy_short_password() {
        let credentials = LoginInput {
            email: "Jane@Biz.com".to_string(),
            password: "old".to_string(),
        }
        .validate()
        .unwrap();

        assert_eq!(credentials.email.as_str(), "jane@biz.com");
        assert_eq!(credentials.password.expose(), "old");
    }
}
