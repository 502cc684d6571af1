use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Credential-linked identity of a member: either an email or a phone number.
///
/// Values are always stored normalized:
/// - emails are trimmed and lower-cased
/// - phone numbers keep only digits (and a leading `+`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Identity {
    Email(String),
    Phone(String),
}

impl Identity {
    pub fn email(raw: &str) -> AppResult<Self> {
        let value = raw.trim().to_lowercase();
        match value.split_once('@') {
            Some((user, domain))
                if !user.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Identity::Email(value))
            }
            _ => Err(AppError::InvalidInput(format!("'{}' is not a valid email", raw))),
        }
    }

    pub fn phone(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
        let has_junk = trimmed
            .chars()
            .any(|c| !(c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')' | '.')));

        if has_junk || !(4..=15).contains(&digits.len()) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not a valid phone number",
                raw
            )));
        }

        if trimmed.starts_with('+') {
            Ok(Identity::Phone(format!("+{}", digits)))
        } else {
            Ok(Identity::Phone(digits))
        }
    }

    /// Guess the kind from free text: anything with an `@` is an email.
    pub fn parse(raw: &str) -> AppResult<Self> {
        if raw.contains('@') {
            Self::email(raw)
        } else {
            Self::phone(raw)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Identity::Email(_) => "email",
            Identity::Phone(_) => "phone",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Identity::Email(v) | Identity::Phone(v) => v,
        }
    }

    /// Convert DB columns → enum
    pub fn from_db(kind: &str, value: &str) -> Option<Self> {
        match kind {
            "email" => Some(Identity::Email(value.to_string())),
            "phone" => Some(Identity::Phone(value.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
