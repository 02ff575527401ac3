//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64url)
//! - Cookie management (`Set-Cookie` building and `Cookie` header parsing)
//! - Password policy and strength scoring

pub mod cookie;
pub mod crypto;
pub mod password;
