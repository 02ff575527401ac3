//! Client Auth State Machine
//!
//! `Loading` → (`Anonymous` | `Authenticated`) on mount and on every refresh.
//! There is no error state: a failed login leaves the store `Anonymous` and
//! the message belongs to the form that started it.
//!
//! State is published on a `tokio::sync::watch` channel so any number of
//! views can follow it.

use std::sync::Arc;

use auth::SessionUser;
use tokio::sync::{mpsc, watch};

use crate::gateway::AuthGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Initial state, and while a session refresh is in flight
    Loading,
    Anonymous,
    Authenticated(SessionUser),
}

impl AuthState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Where the UI should go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login { return_to: Option<String> },
    Register,
    Callback,
    /// In-app path (already validated)
    Path(String),
    /// Off-site URL (hosted OAuth page)
    External(String),
}

impl Route {
    pub fn to_href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { return_to: None } => "/login".to_string(),
            Route::Login {
                return_to: Some(path),
            } => {
                let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
                format!("/login?returnTo={encoded}")
            }
            Route::Register => "/register".to_string(),
            Route::Callback => "/auth/callback".to_string(),
            Route::Path(path) => path.clone(),
            Route::External(url) => url.clone(),
        }
    }

    /// Route for a caller-supplied return path; anything but a same-site path goes home
    pub fn return_to(path: Option<&str>) -> Route {
        match path {
            Some(path) if is_local_path(path) => Route::Path(path.to_string()),
            _ => Route::Home,
        }
    }
}

/// `/foo` is local; `//evil.example` and `https://...` are not
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Performs navigation on behalf of the state machine
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Forward routes to whoever owns the UI loop
impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&self, route: Route) {
        if self.send(route).is_err() {
            tracing::debug!("Navigation receiver dropped");
        }
    }
}

// ============================================================================
// Store
// ============================================================================

pub struct AuthStore<G, N> {
    pub(crate) gateway: Arc<G>,
    navigator: Arc<N>,
    state: watch::Sender<AuthState>,
}

impl<G, N> AuthStore<G, N>
where
    G: AuthGateway + Send + Sync + 'static,
    N: Navigator + 'static,
{
    pub fn new(gateway: Arc<G>, navigator: Arc<N>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            gateway,
            navigator,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Initial session fetch
    pub async fn mount(&self) -> AuthState {
        self.refresh_session().await
    }

    /// Re-fetch the session; transport failures count as anonymous
    pub async fn refresh_session(&self) -> AuthState {
        self.state.send_replace(AuthState::Loading);

        let next = match self.gateway.get_session().await {
            Ok(Some(user)) => AuthState::Authenticated(user),
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Session fetch failed");
                AuthState::Anonymous
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Successful login, register or OAuth callback
    pub fn authenticated(&self, user: SessionUser, return_to: Option<&str>) {
        tracing::debug!(user_id = %user.id, "Client authenticated");
        self.state.send_replace(AuthState::Authenticated(user));
        self.navigator.navigate(Route::return_to(return_to));
    }

    /// Sign out; a failed API call still signs out locally
    pub async fn sign_out(&self) {
        if let Err(e) = self.gateway.sign_out().await {
            tracing::warn!(error = %e, "Sign out request failed");
        }

        self.state.send_replace(AuthState::Anonymous);
        self.navigator.navigate(Route::Login { return_to: None });
    }

    /// Gate for protected pages at `path`
    ///
    /// `None` while loading (render nothing yet) or when anonymous (a redirect
    /// to login carrying `path` has been issued).
    pub fn require_user(&self, path: &str) -> Option<SessionUser> {
        match self.current() {
            AuthState::Loading => None,
            AuthState::Anonymous => {
                self.navigator.navigate(Route::Login {
                    return_to: Some(path.to_string()),
                });
                None
            }
            AuthState::Authenticated(user) => Some(user),
        }
    }

    /// A failed sign-in attempt resolves a pending `Loading` to `Anonymous`
    pub(crate) fn settle_anonymous(&self) {
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = AuthState::Anonymous;
                true
            } else {
                false
            }
        });
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_hrefs() {
        assert_eq!(Route::Home.to_href(), "/");
        assert_eq!(Route::Login { return_to: None }.to_href(), "/login");
        assert_eq!(
            Route::Login {
                return_to: Some("/billing?tab=2".to_string())
            }
            .to_href(),
            "/login?returnTo=%2Fbilling%3Ftab%3D2"
        );
        assert_eq!(Route::Callback.to_href(), "/auth/callback");
    }

    #[test]
    fn test_return_to_only_local_paths() {
        assert_eq!(
            Route::return_to(Some("/dashboard")),
            Route::Path("/dashboard".to_string())
        );
        assert_eq!(Route::return_to(None), Route::Home);
        assert_eq!(Route::return_to(Some("//evil.example")), Route::Home);
        assert_eq!(Route::return_to(Some("https://evil.example")), Route::Home);
        assert_eq!(Route::return_to(Some("/\\evil.example")), Route::Home);
    }

    #[test]
    fn test_state_accessors() {
        assert!(AuthState::Loading.is_loading());
        assert!(AuthState::Anonymous.user().is_none());
        assert!(!AuthState::Anonymous.is_authenticated());
    }
}
