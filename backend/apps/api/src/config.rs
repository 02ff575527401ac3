//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! Missing required values are fatal.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::infra::workos::DEFAULT_REDIRECT_URI;
use auth::{AuthConfig, WorkOsConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

pub struct ServerConfig {
    pub workos: WorkOsConfig,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| optional(key).with_context(|| format!("{key} must be set"));

        let api_key = required("WORKOS_API_KEY")?;
        let client_id = required("WORKOS_CLIENT_ID")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;

        let redirect_uri =
            optional("WORKOS_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        let mut workos = WorkOsConfig::new(api_key, client_id, &redirect_uri)
            .context("invalid WorkOS configuration")?;
        if let Some(base_url) = optional("WORKOS_API_BASE_URL") {
            workos = workos
                .with_api_base_url(&base_url)
                .context("invalid WORKOS_API_BASE_URL")?;
        }

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("invalid BIND_ADDR")?;

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let cookie_secure = match optional("COOKIE_SECURE") {
            None => false,
            Some(value) => parse_flag(&value).context("invalid COOKIE_SECURE")?,
        };

        Ok(Self {
            workos,
            jwt_secret,
            bind_addr,
            frontend_origins,
            auth: if cookie_secure {
                AuthConfig::production()
            } else {
                AuthConfig::default()
            },
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected true or false, got {other:?}"),
    }
}
