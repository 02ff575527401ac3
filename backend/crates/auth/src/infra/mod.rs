//! Infrastructure Layer
//!
//! External service integrations.

pub mod workos;

pub use workos::{WorkOsClient, WorkOsConfig};
