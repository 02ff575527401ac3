//! Value Object Module

pub mod email;
pub mod full_name;
pub mod oauth_provider;
