//! Auth Client
//!
//! Browser-side half of the auth flow, written against the auth API:
//! - `state` - session state machine (`Loading` / `Anonymous` / `Authenticated`)
//! - `forms` - sign-up and sign-in forms with local validation
//! - `callback` - OAuth callback page (single exchange, bounded wait)
//! - `gateway` - API port and its HTTP implementation

pub mod callback;
pub mod error;
pub mod forms;
pub mod gate;
pub mod gateway;
pub mod state;

pub use callback::{CallbackOutcome, CallbackPage, CallbackParams, DEFAULT_CALLBACK_TIMEOUT};
pub use error::{GatewayError, GatewayResult};
pub use forms::{FormOutcome, LoginForm, RegisterForm};
pub use gate::OneShotGate;
pub use gateway::{AuthGateway, HttpAuthGateway, LocalAuthGateway};
pub use state::{AuthState, AuthStore, Navigator, Route};

#[cfg(test)]
mod tests;
