//! Password Policy and Strength
//!
//! Passwords are stored and verified by the external identity provider; this
//! module only decides whether a candidate is acceptable to forward and how
//! strong it looks to the person typing it.
//!
//! ## Security Features
//! - Zeroization of the clear text on drop
//! - Redacted `Debug` output
//! - The clear text is forwarded byte-for-byte (no normalization), so the
//!   value used at sign-up is the value used at sign-in

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Nothing was entered
    #[error("Password is required")]
    Empty,

    /// Password is too short
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone` to prevent accidental copies.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Accept a new password (sign-up): 8..=128 code points
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        // NIST: Count Unicode code points (not bytes)
        let char_count = raw.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(raw))
    }

    /// Accept an existing password (sign-in): anything non-empty
    ///
    /// Older accounts may predate the current policy, so only emptiness is
    /// checked here; the provider decides whether it matches.
    pub fn existing(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    /// Clear text for forwarding to the identity provider
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Strength scoring
// ============================================================================

/// Coarse password strength
///
/// One point each for: at least [`MIN_PASSWORD_LENGTH`] characters, an ASCII
/// uppercase letter, an ASCII digit, and a character outside `[A-Za-z0-9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// Nothing scored (nothing to show)
    None,
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn of(password: &str) -> Self {
        let mut score = 0u8;
        if password.chars().count() >= MIN_PASSWORD_LENGTH {
            score += 1;
        }
        if password.chars().any(|c| c.is_ascii_uppercase()) {
            score += 1;
        }
        if password.chars().any(|c| c.is_ascii_digit()) {
            score += 1;
        }
        if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
            score += 1;
        }

        match score {
            0 => Self::None,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Good,
            _ => Self::Strong,
        }
    }

    /// Number of filled bars (0..=4)
    pub fn score(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
