//! Sign-up / sign-in forms
//!
//! Forms are validated locally first; an invalid form never reaches the
//! network. Server-side field errors are mapped back onto the form's own
//! field names.

use auth::SessionUser;
use auth::models::email::Email;
use auth::models::full_name::FullName;
use auth::models::oauth_provider::OAuthProvider;
use kernel::validation::{FieldErrors, Validated};
use platform::password::{
    ClearTextPassword, MIN_PASSWORD_LENGTH, PasswordPolicyError, PasswordStrength,
};

use crate::gateway::AuthGateway;
use crate::state::{AuthStore, Navigator, Route};

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const TERMS_NOT_ACCEPTED: &str = "You must accept the Terms of Service.";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

const REGISTRATION_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Invalid credentials";
const OAUTH_START_FAILED: &str = "Failed to start OAuth sign-in";

/// Result of submitting a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Rejected before any request was made
    Invalid(FieldErrors),
    /// The API refused (bad credentials, email taken, provider down)
    Failed(String),
    Success(SessionUser),
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Validated<()> {
        let mut errors = FieldErrors::new();

        errors.check("fullName", FullName::parse(&self.full_name));
        errors.check(
            "email",
            Email::new(&self.email).map_err(|_| INVALID_EMAIL),
        );

        if let Err(e) = ClearTextPassword::new(self.password.clone()) {
            errors.insert("password", password_message(e));
        }

        if self.password != self.confirm_password {
            errors.insert("confirmPassword", PASSWORDS_DO_NOT_MATCH);
        }

        if !self.accept_terms {
            errors.insert("acceptTerms", TERMS_NOT_ACCEPTED);
        }

        errors.finish(|| ())
    }

    /// Strength meter shown under the password input
    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::of(&self.password)
    }
}

/// Blank and short passwords get the same length hint
fn password_message(error: PasswordPolicyError) -> String {
    match error {
        PasswordPolicyError::Empty => PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: 0,
        }
        .to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Validated<()> {
        let mut errors = FieldErrors::new();

        errors.check(
            "email",
            Email::new(&self.email).map_err(|_| INVALID_EMAIL),
        );
        if self.password.is_empty() {
            errors.insert("password", PASSWORD_REQUIRED);
        }

        errors.finish(|| ())
    }
}

/// Server field names → form field names
fn map_server_field_errors(server: FieldErrors) -> FieldErrors {
    let mut mapped = FieldErrors::new();
    for (field, message) in server.iter() {
        let field = match field {
            "name" => "fullName",
            other => other,
        };
        mapped.insert(field, message);
    }
    mapped
}

impl<G, N> AuthStore<G, N>
where
    G: AuthGateway + Send + Sync + 'static,
    N: Navigator + 'static,
{
    pub async fn register(&self, form: &RegisterForm, return_to: Option<&str>) -> FormOutcome {
        if let Err(errors) = form.validate() {
            return FormOutcome::Invalid(errors);
        }

        let response = match self
            .gateway
            .register(form.full_name.trim(), form.email.trim(), &form.password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Registration request failed");
                self.settle_anonymous();
                return FormOutcome::Failed(SOMETHING_WENT_WRONG.to_string());
            }
        };

        match (response.success, response.user) {
            (true, Some(user)) => {
                self.authenticated(user.clone(), return_to);
                FormOutcome::Success(user)
            }
            _ => {
                self.settle_anonymous();
                match response.field_errors {
                    Some(errors) if !errors.is_empty() => {
                        FormOutcome::Invalid(map_server_field_errors(errors))
                    }
                    _ => FormOutcome::Failed(
                        response
                            .error
                            .unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
                    ),
                }
            }
        }
    }

    pub async fn login(&self, form: &LoginForm, return_to: Option<&str>) -> FormOutcome {
        if let Err(errors) = form.validate() {
            return FormOutcome::Invalid(errors);
        }

        let response = match self
            .gateway
            .login(form.email.trim(), &form.password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Login request failed");
                self.settle_anonymous();
                return FormOutcome::Failed(SOMETHING_WENT_WRONG.to_string());
            }
        };

        match (response.success, response.user) {
            (true, Some(user)) => {
                self.authenticated(user.clone(), return_to);
                FormOutcome::Success(user)
            }
            _ => {
                self.settle_anonymous();
                match response.field_errors {
                    Some(errors) if !errors.is_empty() => {
                        FormOutcome::Invalid(map_server_field_errors(errors))
                    }
                    _ => FormOutcome::Failed(
                        response.error.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                    ),
                }
            }
        }
    }

    /// Fetch the hosted sign-in URL for `provider` and navigate to it
    pub async fn start_oauth(&self, provider: OAuthProvider) -> Result<(), String> {
        let response = self.gateway.oauth_url(provider).await.map_err(|e| {
            tracing::error!(provider = %provider, error = %e, "OAuth URL request failed");
            SOMETHING_WENT_WRONG.to_string()
        })?;

        match response.url {
            Some(url) if response.success => {
                self.navigate(Route::External(url));
                Ok(())
            }
            _ => Err(response
                .error
                .unwrap_or_else(|| OAUTH_START_FAILED.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_form() -> RegisterForm {
        RegisterForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@biz.com".to_string(),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_register_form() {
        assert!(valid_register_form().validate().is_ok());
    }

    #[test]
    fn test_register_form_messages() {
        let form = RegisterForm {
            full_name: "   ".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            confirm_password: "shorter".to_string(),
            accept_terms: false,
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("fullName"), Some("Full name is required"));
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get("confirmPassword"), Some(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(errors.get("acceptTerms"), Some(TERMS_NOT_ACCEPTED));
    }

    #[test]
    fn test_blank_password_gets_length_hint() {
        let form = RegisterForm {
            password: String::new(),
            confirm_password: String::new(),
            ..valid_register_form()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert!(!errors.contains("confirmPassword"));
    }

    #[test]
    fn test_password_strength() {
        let mut form = valid_register_form();
        assert_eq!(form.password_strength(), PasswordStrength::Strong);

        form.password = String::new();
        assert_eq!(form.password_strength(), PasswordStrength::None);
    }

    #[test]
    fn test_login_form_messages() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(errors.get("password"), Some(PASSWORD_REQUIRED));

        let form = LoginForm {
            email: "jane@biz.com".to_string(),
            password: "x".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_server_name_error_maps_to_full_name() {
        let mut server = FieldErrors::new();
        server.insert("name", "Full name is required");
        server.insert("email", "Invalid email address");

        let mapped = map_server_field_errors(server);
        assert_eq!(mapped.get("fullName"), Some("Full name is required"));
        assert_eq!(mapped.get("email"), Some("Invalid email address"));
        assert!(!mapped.contains("name"));
    }
}
