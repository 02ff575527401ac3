//! Client flow tests
//! Store, forms and callback page against an in-memory gateway, plus one
//! end-to-end run through the real auth router over HTTP.

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use auth::SessionUser;
    use auth::models::oauth_provider::OAuthProvider;
    use auth::models::AuthResponse;
    use kernel::validation::FieldErrors;
    use tokio::sync::mpsc;

    use crate::error::{GatewayError, GatewayResult};
    use crate::gateway::AuthGateway;
    use crate::state::{AuthStore, Route};

    pub const GOOD_PASSWORD: &str = "Passw0rd!";
    pub const GOOD_CODE: &str = "good-code";

    pub fn jane() -> SessionUser {
        SessionUser {
            id: "user_01JANE".to_string(),
            email: "jane@biz.com".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            profile_picture_url: None,
        }
    }

    #[derive(Default)]
    pub struct FakeGateway {
        pub session: Mutex<Option<SessionUser>>,
        pub callback_delay: Duration,
        pub fail_sign_out: bool,
        pub register_calls: AtomicUsize,
        pub login_calls: AtomicUsize,
        pub callback_calls: AtomicUsize,
        pub sign_out_calls: AtomicUsize,
    }

    impl FakeGateway {
        pub fn count(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    impl AuthGateway for FakeGateway {
        async fn get_session(&self) -> GatewayResult<Option<SessionUser>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn register(
            &self,
            name: &str,
            _email: &str,
            _password: &str,
        ) -> GatewayResult<AuthResponse> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);

            if name == "Server Rejects" {
                let mut errors = FieldErrors::new();
                errors.insert("name", "Full name is required");
                return Ok(AuthResponse::failure("Validation failed")
                    .with_field_errors(Some(errors)));
            }
            Ok(AuthResponse::with_user(jane()))
        }

        async fn login(&self, _email: &str, password: &str) -> GatewayResult<AuthResponse> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);

            if password == GOOD_PASSWORD {
                Ok(AuthResponse::with_user(jane()))
            } else {
                Ok(AuthResponse::failure("Invalid credentials"))
            }
        }

        async fn oauth_url(&self, provider: OAuthProvider) -> GatewayResult<AuthResponse> {
            Ok(AuthResponse::with_url(format!(
                "https://auth.test/authorize?provider={}",
                provider.as_str()
            )))
        }

        async fn oauth_callback(&self, code: &str) -> GatewayResult<AuthResponse> {
            self.callback_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.callback_delay).await;

            if code == GOOD_CODE {
                Ok(AuthResponse::with_user(jane()))
            } else {
                Ok(AuthResponse::failure("OAuth authentication failed"))
            }
        }

        async fn sign_out(&self) -> GatewayResult<()> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_sign_out {
                return Err(GatewayError::UnexpectedResponse { status: 500 });
            }
            Ok(())
        }
    }

    pub type TestStore = AuthStore<FakeGateway, mpsc::UnboundedSender<Route>>;

    pub fn store_with(
        gateway: FakeGateway,
    ) -> (Arc<TestStore>, Arc<FakeGateway>, mpsc::UnboundedReceiver<Route>) {
        let gateway = Arc::new(gateway);
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Arc::new(AuthStore::new(gateway.clone(), Arc::new(tx)));
        (store, gateway, rx)
    }

    pub fn store() -> (Arc<TestStore>, Arc<FakeGateway>, mpsc::UnboundedReceiver<Route>) {
        store_with(FakeGateway::default())
    }
}

#[cfg(test)]
mod state_tests {
    use super::support::{jane, store, store_with, FakeGateway};
    use crate::state::{AuthState, Route};

    #[tokio::test]
    async fn test_starts_loading_then_anonymous() {
        let (store, _, _rx) = store();
        assert_eq!(store.current(), AuthState::Loading);

        let state = store.mount().await;
        assert_eq!(state, AuthState::Anonymous);
        assert_eq!(store.current(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_mount_with_session() {
        let gateway = FakeGateway::default();
        *gateway.session.lock().unwrap() = Some(jane());
        let (store, _, _rx) = store_with(gateway);

        let mut watcher = store.subscribe();
        store.mount().await;

        assert!(watcher.has_changed().unwrap());
        assert_eq!(*watcher.borrow_and_update(), AuthState::Authenticated(jane()));
    }

    #[tokio::test]
    async fn test_require_user_while_loading_waits() {
        let (store, _, mut rx) = store();

        assert!(store.require_user("/dashboard").is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_require_user_redirects_anonymous() {
        let (store, _, mut rx) = store();
        store.mount().await;

        assert!(store.require_user("/dashboard").is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            Route::Login {
                return_to: Some("/dashboard".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_require_user_returns_user() {
        let (store, _, mut rx) = store();
        store.authenticated(jane(), None);
        assert_eq!(rx.try_recv().unwrap(), Route::Home);

        assert_eq!(store.require_user("/dashboard"), Some(jane()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sign_out_even_when_request_fails() {
        let (store, gateway, mut rx) = store_with(FakeGateway {
            fail_sign_out: true,
            ..Default::default()
        });
        store.authenticated(jane(), Some("/settings"));
        assert_eq!(rx.try_recv().unwrap(), Route::Path("/settings".to_string()));

        store.sign_out().await;

        assert_eq!(FakeGateway::count(&gateway.sign_out_calls), 1);
        assert_eq!(store.current(), AuthState::Anonymous);
        assert_eq!(rx.try_recv().unwrap(), Route::Login { return_to: None });
    }
}

#[cfg(test)]
mod form_tests {
    use super::support::{jane, store, FakeGateway, GOOD_PASSWORD};
    use crate::forms::{FormOutcome, LoginForm, RegisterForm, PASSWORDS_DO_NOT_MATCH};
    use crate::state::{AuthState, Route};
    use auth::models::oauth_provider::OAuthProvider;

    fn register_form() -> RegisterForm {
        RegisterForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@biz.com".to_string(),
            password: GOOD_PASSWORD.to_string(),
            confirm_password: GOOD_PASSWORD.to_string(),
            accept_terms: true,
        }
    }

    #[tokio::test]
    async fn test_short_password_never_reaches_gateway() {
        let (store, gateway, _rx) = store();
        let form = RegisterForm {
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            ..register_form()
        };

        let FormOutcome::Invalid(errors) = store.register(&form, None).await else {
            panic!("expected invalid form");
        };
        assert!(
            errors
                .get("password")
                .unwrap()
                .contains("must be at least 8 characters")
        );
        assert_eq!(FakeGateway::count(&gateway.register_calls), 0);
    }

    #[tokio::test]
    async fn test_mismatched_confirmation_never_reaches_gateway() {
        let (store, gateway, _rx) = store();
        let form = RegisterForm {
            confirm_password: "Passw0rd?".to_string(),
            ..register_form()
        };

        let FormOutcome::Invalid(errors) = store.register(&form, None).await else {
            panic!("expected invalid form");
        };
        assert_eq!(errors.get("confirmPassword"), Some(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(FakeGateway::count(&gateway.register_calls), 0);
    }

    #[tokio::test]
    async fn test_register_success_authenticates() {
        let (store, gateway, mut rx) = store();

        let outcome = store.register(&register_form(), None).await;

        assert_eq!(outcome, FormOutcome::Success(jane()));
        assert_eq!(FakeGateway::count(&gateway.register_calls), 1);
        assert_eq!(store.current(), AuthState::Authenticated(jane()));
        assert_eq!(rx.try_recv().unwrap(), Route::Home);
    }

    #[tokio::test]
    async fn test_register_maps_server_field_errors() {
        let (store, _, _rx) = store();
        let form = RegisterForm {
            full_name: "Server Rejects".to_string(),
            ..register_form()
        };

        let FormOutcome::Invalid(errors) = store.register(&form, None).await else {
            panic!("expected server field errors");
        };
        assert_eq!(errors.get("fullName"), Some("Full name is required"));
        assert_eq!(store.current(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_state() {
        let (store, gateway, mut rx) = store();
        store.mount().await;

        let form = LoginForm {
            email: "jane@biz.com".to_string(),
            password: "wrong-password".to_string(),
        };
        let outcome = store.login(&form, None).await;

        assert_eq!(outcome, FormOutcome::Failed("Invalid credentials".to_string()));
        assert_eq!(FakeGateway::count(&gateway.login_calls), 1);
        assert_eq!(store.current(), AuthState::Anonymous);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_login_returns_to_requested_page() {
        let (store, _, mut rx) = store();
        let form = LoginForm {
            email: "jane@biz.com".to_string(),
            password: GOOD_PASSWORD.to_string(),
        };

        let outcome = store.login(&form, Some("/billing")).await;

        assert_eq!(outcome, FormOutcome::Success(jane()));
        assert_eq!(rx.try_recv().unwrap(), Route::Path("/billing".to_string()));
    }

    #[tokio::test]
    async fn test_start_oauth_navigates_to_hosted_page() {
        let (store, _, mut rx) = store();

        store.start_oauth(OAuthProvider::GitHub).await.unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            Route::External("https://auth.test/authorize?provider=GitHubOAuth".to_string())
        );
    }
}

#[cfg(test)]
mod callback_tests {
    use std::time::Duration;

    use super::support::{jane, store, store_with, FakeGateway, GOOD_CODE};
    use crate::callback::{
        CallbackOutcome, CallbackPage, CallbackParams, CALLBACK_TIMED_OUT, NO_AUTHORIZATION_CODE,
    };
    use crate::state::{AuthState, Route};

    fn with_code(code: &str) -> CallbackParams {
        CallbackParams {
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_code_skips_gateway() {
        let (store, gateway, _rx) = store();
        let page = CallbackPage::new(store);

        let outcome = page.run(&CallbackParams::default()).await;

        assert_eq!(
            outcome,
            CallbackOutcome::Failed(NO_AUTHORIZATION_CODE.to_string())
        );
        assert_eq!(FakeGateway::count(&gateway.callback_calls), 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_reported() {
        let (store, gateway, _rx) = store();
        let page = CallbackPage::new(store);
        let params =
            CallbackParams::from_query("error=access_denied&error_description=User+cancelled");

        let outcome = page.run(&params).await;

        assert_eq!(
            outcome,
            CallbackOutcome::Failed("User cancelled (access_denied)".to_string())
        );
        assert_eq!(FakeGateway::count(&gateway.callback_calls), 0);
    }

    #[tokio::test]
    async fn test_success_authenticates() {
        let (store, _, mut rx) = store();
        let page = CallbackPage::new(store.clone());

        let outcome = page.run(&with_code(GOOD_CODE)).await;

        assert_eq!(outcome, CallbackOutcome::Success(jane()));
        assert_eq!(store.current(), AuthState::Authenticated(jane()));
        assert_eq!(rx.try_recv().unwrap(), Route::Home);
    }

    #[tokio::test]
    async fn test_rejected_code() {
        let (store, _, _rx) = store();
        let page = CallbackPage::new(store);

        let outcome = page.run(&with_code("stale-code")).await;

        assert_eq!(
            outcome,
            CallbackOutcome::Failed("OAuth authentication failed".to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_run_exchanges_once() {
        let (store, gateway, _rx) = store_with(FakeGateway {
            callback_delay: Duration::from_millis(20),
            ..Default::default()
        });
        let page = CallbackPage::new(store);
        let params = with_code(GOOD_CODE);

        let (first, second) = tokio::join!(page.run(&params), page.run(&params));

        let outcomes = [first, second];
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == CallbackOutcome::Duplicate)
                .count(),
            1
        );
        assert!(outcomes.contains(&CallbackOutcome::Success(jane())));
        assert_eq!(FakeGateway::count(&gateway.callback_calls), 1);

        // A later re-run of the same page is also refused
        assert_eq!(page.run(&params).await, CallbackOutcome::Duplicate);
        assert_eq!(FakeGateway::count(&gateway.callback_calls), 1);
    }

    #[tokio::test]
    async fn test_slow_exchange_times_out() {
        let (store, _, _rx) = store_with(FakeGateway {
            callback_delay: Duration::from_millis(500),
            ..Default::default()
        });
        let page = CallbackPage::new(store.clone()).with_timeout(Duration::from_millis(20));

        let outcome = page.run(&with_code(GOOD_CODE)).await;

        assert_eq!(outcome, CallbackOutcome::Failed(CALLBACK_TIMED_OUT.to_string()));
        assert_eq!(store.current(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_failed_callback_resolves_to_anonymous() {
        let (store, gateway, _rx) = store();
        assert_eq!(store.current(), AuthState::Loading);

        let page = CallbackPage::new(store.clone());
        let outcome = page.run(&CallbackParams::default()).await;

        assert!(matches!(outcome, CallbackOutcome::Failed(_)));
        assert_eq!(store.current(), AuthState::Anonymous);
        assert_eq!(FakeGateway::count(&gateway.callback_calls), 0);

        let page = CallbackPage::new(store.clone());
        page.run(&with_code("stale-code")).await;
        assert_eq!(store.current(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_failed_callback_keeps_existing_session() {
        let (store, _, _rx) = store();
        store.authenticated(jane(), None);

        let page = CallbackPage::new(store.clone());
        page.run(&with_code("stale-code")).await;

        assert_eq!(store.current(), AuthState::Authenticated(jane()));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};

    use auth::models::email::Email;
    use auth::models::oauth_provider::OAuthProvider;
    use auth::{AuthConfig, AuthError, AuthResult, IdentityProvider, NewUser, SessionCodec};
    use auth::{SessionUser, auth_router_generic};
    use platform::password::ClearTextPassword;
    use tokio::sync::mpsc;

    use crate::forms::{FormOutcome, RegisterForm};
    use crate::gateway::HttpAuthGateway;
    use crate::state::{AuthState, AuthStore, Route};

    /// Provider that remembers registered accounts
    #[derive(Clone, Default)]
    struct InMemoryProvider {
        users: Arc<Mutex<Vec<(SessionUser, String)>>>,
    }

    impl IdentityProvider for InMemoryProvider {
        async fn create_user(&self, new_user: &NewUser) -> AuthResult<SessionUser> {
            let mut users = self.users.lock().unwrap();
            let user = SessionUser {
                id: format!("user_{}", users.len() + 1),
                email: new_user.email.to_string(),
                first_name: Some(new_user.name.first_name().to_string()),
                last_name: new_user.name.last_name().map(str::to_string),
                profile_picture_url: None,
            };
            users.push((user.clone(), new_user.password.expose().to_string()));
            Ok(user)
        }

        async fn authenticate_with_password(
            &self,
            email: &Email,
            password: &ClearTextPassword,
        ) -> AuthResult<SessionUser> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|(u, p)| u.email == email.as_str() && p == password.expose())
                .map(|(u, _)| u.clone())
                .ok_or(AuthError::Provider {
                    operation: "password authentication",
                    status: 400,
                    message: None,
                })
        }

        fn authorization_url(&self, provider: OAuthProvider) -> AuthResult<String> {
            Ok(format!("https://auth.test/authorize?provider={}", provider.as_str()))
        }

        async fn authenticate_with_code(&self, _code: &str) -> AuthResult<SessionUser> {
            Err(AuthError::Provider {
                operation: "code exchange",
                status: 400,
                message: None,
            })
        }
    }

    #[tokio::test]
    async fn test_register_refresh_sign_out_over_http() {
        let provider = InMemoryProvider::default();
        let codec = SessionCodec::new(b"client-e2e-secret", auth::config::SESSION_TTL).unwrap();
        let app = axum::Router::new().nest(
            "/api/auth",
            auth_router_generic(provider.clone(), codec, AuthConfig::default()),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let gateway = HttpAuthGateway::new(&format!("http://{addr}/api/auth")).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = AuthStore::new(Arc::new(gateway), Arc::new(tx));

        assert_eq!(store.mount().await, AuthState::Anonymous);

        let form = RegisterForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@biz.com".to_string(),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
            accept_terms: true,
        };
        let FormOutcome::Success(user) = store.register(&form, None).await else {
            panic!("registration should succeed");
        };

        assert_eq!(user.first_name.as_deref(), Some("Jane"));
        assert_eq!(user.last_name.as_deref(), Some("Doe"));
        assert_eq!(store.current(), AuthState::Authenticated(user.clone()));
        assert_eq!(rx.try_recv().unwrap(), Route::Home);

        let stored = provider.users.lock().unwrap()[0].0.clone();
        assert_eq!(stored, user);

        // The session cookie set by register is sent back on refresh
        assert_eq!(
            store.refresh_session().await,
            AuthState::Authenticated(user)
        );

        store.sign_out().await;
        assert_eq!(store.current(), AuthState::Anonymous);
        assert_eq!(store.refresh_session().await, AuthState::Anonymous);
    }
}
