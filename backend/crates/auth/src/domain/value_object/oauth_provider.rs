//! OAuth Provider Value Object
//!
//! Social login connections offered on the login and register pages. The
//! string form is the identifier the identity provider expects in the
//! authorization URL.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported OAuth provider: {0}")]
pub struct UnsupportedProvider(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OAuthProvider {
    #[serde(rename = "GoogleOAuth")]
    Google,
    #[serde(rename = "GitHubOAuth")]
    GitHub,
    #[serde(rename = "MicrosoftOAuth")]
    Microsoft,
    #[serde(rename = "AppleOAuth")]
    Apple,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 4] = [
        OAuthProvider::Google,
        OAuthProvider::GitHub,
        OAuthProvider::Microsoft,
        OAuthProvider::Apple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "GoogleOAuth",
            OAuthProvider::GitHub => "GitHubOAuth",
            OAuthProvider::Microsoft => "MicrosoftOAuth",
            OAuthProvider::Apple => "AppleOAuth",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::GitHub => "GitHub",
            OAuthProvider::Microsoft => "Microsoft",
            OAuthProvider::Apple => "Apple",
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = UnsupportedProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OAuthProvider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnsupportedProvider(s.to_string()))
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
