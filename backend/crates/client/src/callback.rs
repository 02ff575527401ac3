//! OAuth callback page
//!
//! Landing point after the hosted provider sign-in. The authorization code
//! is exchanged at most once per page instance, and the user is never left
//! waiting longer than the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use auth::SessionUser;

use crate::forms::SOMETHING_WENT_WRONG;
use crate::gate::OneShotGate;
use crate::gateway::AuthGateway;
use crate::state::{AuthStore, Navigator};

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(15);

pub const NO_AUTHORIZATION_CODE: &str = "No authorization code received";
pub const CALLBACK_TIMED_OUT: &str = "Authentication timed out. Please try again.";
const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Query parameters the provider redirects back with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse a query string (with or without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "code" if params.code.is_none() => params.code = Some(value),
                "error" if params.error.is_none() => params.error = Some(value),
                "error_description" if params.error_description.is_none() => {
                    params.error_description = Some(value)
                }
                _ => {}
            }
        }

        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success(SessionUser),
    Failed(String),
    /// The gate was already claimed; another run owns this code
    Duplicate,
}

pub struct CallbackPage<G, N> {
    store: Arc<AuthStore<G, N>>,
    gate: OneShotGate,
    timeout: Duration,
}

impl<G, N> CallbackPage<G, N>
where
    G: AuthGateway + Send + Sync + 'static,
    N: Navigator + 'static,
{
    pub fn new(store: Arc<AuthStore<G, N>>) -> Self {
        Self {
            store,
            gate: OneShotGate::new(),
            timeout: DEFAULT_CALLBACK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn run(&self, params: &CallbackParams) -> CallbackOutcome {
        if !self.gate.claim() {
            tracing::debug!("OAuth callback already handled");
            return CallbackOutcome::Duplicate;
        }

        let outcome = self.exchange(params).await;
        if matches!(outcome, CallbackOutcome::Failed(_)) {
            self.store.settle_anonymous();
        }
        outcome
    }

    async fn exchange(&self, params: &CallbackParams) -> CallbackOutcome {
        if let Some(error) = params.error.as_deref() {
            let description = params.error_description.as_deref().unwrap_or(error);
            tracing::warn!(error, "OAuth provider returned an error");
            return CallbackOutcome::Failed(format!("{description} ({error})"));
        }

        let Some(code) = params.code.clone().filter(|c| !c.trim().is_empty()) else {
            return CallbackOutcome::Failed(NO_AUTHORIZATION_CODE.to_string());
        };

        // The exchange keeps running after a timeout; only the wait is abandoned.
        let store = self.store.clone();
        let exchange = tokio::spawn(async move { store.gateway.oauth_callback(&code).await });

        let response = match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "OAuth callback timed out"
                );
                return CallbackOutcome::Failed(CALLBACK_TIMED_OUT.to_string());
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "OAuth callback task failed");
                return CallbackOutcome::Failed(SOMETHING_WENT_WRONG.to_string());
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(error = %e, "OAuth callback request failed");
                return CallbackOutcome::Failed(SOMETHING_WENT_WRONG.to_string());
            }
            Ok(Ok(Ok(response))) => response,
        };

        match (response.success, response.user) {
            (true, Some(user)) => {
                self.store.authenticated(user.clone(), None);
                CallbackOutcome::Success(user)
            }
            _ => CallbackOutcome::Failed(
                response
                    .error
                    .unwrap_or_else(|| AUTHENTICATION_FAILED.to_string()),
            ),
        }
    }
}
