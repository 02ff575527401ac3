//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod get_session;
pub mod login;
pub mod oauth;
pub mod register;
pub mod session_codec;
pub mod sign_out;

// Re-exports
pub use config::AuthConfig;
pub use get_session::GetSessionUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use oauth::OAuthUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use session_codec::{SessionCodec, SessionGrant};
pub use sign_out::SignOutUseCase;
