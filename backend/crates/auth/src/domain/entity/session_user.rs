//! Session User Entity
//!
//! The identity carried inside a session token. It is never mutated while a
//! token is alive; when the identity changes a new token is minted.

use serde::{Deserialize, Serialize};

/// Authenticated user as seen by the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Identity provider user ID
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}
