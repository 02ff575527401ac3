//! Full Name Value Object
//!
//! 登録フォームの「氏名」1 フィールドを、ID プロバイダーが要求する
//! first name / last name に分割する。
//!
//! ## 設計方針
//! - NFKC正規化 → trim → 空白で分割 の順で処理
//! - 先頭トークンが first name、残りを半角スペース 1 つで連結したものが last name
//! - トークンが 1 つだけの場合 last name は `None`（空文字列にはしない）
//!
//! ## 不変条件
//! - first name は空にならない
//! - 長さ: 1〜100文字（正規化後、連続空白は 1 つに畳まれる）

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a full name (in characters, after normalization)
pub const FULL_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FullNameError {
    #[error("Full name is required")]
    Empty,

    #[error("Full name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Validated full name, split into provider fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    first: String,
    last: Option<String>,
}

impl FullName {
    pub fn parse(raw: &str) -> Result<Self, FullNameError> {
        let normalized: String = raw.nfkc().collect();
        let mut tokens = normalized.split_whitespace();

        let first = tokens.next().ok_or(FullNameError::Empty)?.to_string();
        let rest = tokens.collect::<Vec<_>>().join(" ");
        let last = (!rest.is_empty()).then_some(rest);

        let name = Self { first, last };
        if name.to_string().chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(FullNameError::TooLong {
                max: FULL_NAME_MAX_LENGTH,
            });
        }

        Ok(name)
    }

    pub fn first_name(&self) -> &str {
        &self.first
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last {
            Some(last) => write!(f, "{} {}", self.first, last),
            None => f.write_str(&self.first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tokens() {
        let name = FullName::parse("Jane Doe").unwrap();
        assert_eq!(name.first_name(), "Jane");
        assert_eq!(name.last_name(), Some("Doe"));
    }

    #[test]
    fn test_single_token_has_no_last_name() {
        let name = FullName::parse("  Cher ").unwrap();
        assert_eq!(name.first_name(), "Cher");
        assert_eq!(name.last_name(), None);
    }

    #[test]
    fn test_rest_joined_with_single_space() {
        let name = FullName::parse("Juan   Carlos  de la Cruz").unwrap();
        assert_eq!(name.first_name(), "Juan");
        assert_eq!(name.last_name(), Some("Carlos de la Cruz"));
        assert_eq!(name.to_string(), "Juan Carlos de la Cruz");
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width letters and an ideographic space
        let name = FullName::parse("Ｊａｎｅ\u{3000}Ｄｏｅ").unwrap();
        assert_eq!(name.first_name(), "Jane");
        assert_eq!(name.last_name(), Some("Doe"));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(FullName::parse("").unwrap_err(), FullNameError::Empty);
        assert_eq!(FullName::parse(" \t ").unwrap_err(), FullNameError::Empty);
        assert_eq!(
            FullNameError::Empty.to_string(),
            "Full name is required"
        );
    }

    #[test]
    fn test_too_long_rejected() {
        let raw = format!("Jane {}", "x".repeat(FULL_NAME_MAX_LENGTH));
        assert!(matches!(
            FullName::parse(&raw),
            Err(FullNameError::TooLong { .. })
        ));
    }
}
