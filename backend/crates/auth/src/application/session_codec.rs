//! Session Codec
//!
//! Mints and verifies the stateless session token stored in the session
//! cookie: a compact HS256 JWT whose claims are `{ user, iat, exp }`.
//!
//! Verification fails closed. Any malformed, tampered, foreign-algorithm or
//! expired token yields `None`, which callers treat exactly like "no cookie".
//! There is no revocation list; a leaked token stays valid until `exp`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};

use crate::domain::entity::session_user::SessionUser;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: &str = "HS256";

#[derive(Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct SessionClaims {
    user: SessionUser,
    iat: i64,
    exp: i64,
}

/// Why a token was not accepted (logged only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Malformed,
    Signature,
    Algorithm,
    Expired,
}

/// A freshly authenticated user together with their new session token
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user: SessionUser,
    pub token: String,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionCodec {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl SessionCodec {
    /// Create a codec; an empty secret is a configuration error
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> AuthResult<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::Config(
                "session signing secret must not be empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(AuthError::Config("session TTL must be positive".to_string()));
        }

        Ok(Self {
            secret: Arc::from(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `user`, valid for the configured TTL from now
    pub fn create_token(&self, user: &SessionUser) -> AuthResult<String> {
        self.create_token_at(user, Utc::now())
    }

    pub fn create_token_at(&self, user: &SessionUser, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl_secs| iat.checked_add(ttl_secs))
            .ok_or_else(|| AuthError::Config("session TTL out of range".to_string()))?;

        let header = TokenHeader {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        };
        let claims = SessionClaims {
            user: user.clone(),
            iat,
            exp,
        };

        let header = serde_json::to_vec(&header)
            .map_err(|e| AuthError::Internal(format!("token header encoding: {e}")))?;
        let claims = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("token claims encoding: {e}")))?;

        let signing_input = format!("{}.{}", to_base64url(&header), to_base64url(&claims));
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes());

        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Mint a token and pair it with the user it was minted for
    pub fn grant(&self, user: SessionUser) -> AuthResult<SessionGrant> {
        let token = self.create_token(&user)?;
        Ok(SessionGrant { user, token })
    }

    /// Verify a token; `None` on any failure
    pub fn verify_token(&self, token: &str) -> Option<SessionUser> {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionUser> {
        match self.decode(token, now) {
            Ok(user) => Some(user),
            Err(reason) => {
                tracing::debug!(?reason, "Session token rejected");
                None
            }
        }
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<SessionUser, Rejection> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Rejection::Malformed);
        };

        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        let signature = from_base64url(signature_b64).map_err(|_| Rejection::Malformed)?;
        if !verify_hmac_sha256(&self.secret, signing_input.as_bytes(), &signature) {
            return Err(Rejection::Signature);
        }

        let header: TokenHeader = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(Rejection::Algorithm);
        }

        let claims: SessionClaims = decode_segment(claims_b64)?;
        if now.timestamp() >= claims.exp {
            return Err(Rejection::Expired);
        }

        Ok(claims.user)
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, Rejection> {
    let bytes = from_base64url(segment).map_err(|_| Rejection::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| Rejection::Malformed)
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
