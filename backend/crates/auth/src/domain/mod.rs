//! Domain Layer
//!
//! Contains entities, value objects, and the identity provider port.

pub mod entity;
pub mod identity;
pub mod value_object;

// Re-exports
pub use entity::session_user::SessionUser;
pub use identity::{IdentityProvider, LocalIdentityProvider, NewUser};
