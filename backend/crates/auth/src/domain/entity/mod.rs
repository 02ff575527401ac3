//! Entity Module

pub mod session_user;
