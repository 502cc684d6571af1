//! File-backed token registry.
//!
//! YAML layout:
//!
//! ```yaml
//! tokens:
//!   - token: "tk-alice"
//!     email: "alice@example.org"
//!     display_name: "Alice"
//!   - token: "tk-bob"
//!     phone: "+39 333 1234567"
//!     display_name: "Bob"
//!     expires_at: "2027-01-01T00:00:00Z"
//! ```

use super::{IdentityClaim, IdentityResolver, ResolvedIdentity};
use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone)]
struct Profile {
    identity: Identity,
    display_name: String,
    expires_at: Option<DateTime<Utc>>,
}

pub struct TokenRegistry {
    by_token: HashMap<String, Profile>,
    now: fn() -> DateTime<Utc>,
}

impl TokenRegistry {
    /// Build a registry from entries. Every entry must carry exactly one of
    /// `email` / `phone`.
    pub fn from_entries(entries: Vec<TokenEntry>) -> AppResult<Self> {
        let mut by_token = HashMap::new();

        for e in entries {
            let identity = match (&e.email, &e.phone) {
                (Some(mail), None) => Identity::email(mail)?,
                (None, Some(phone)) => Identity::phone(phone)?,
                _ => {
                    return Err(AppError::Config(format!(
                        "token entry '{}' must have exactly one of email/phone",
                        e.token
                    )));
                }
            };

            let display_name = if e.display_name.trim().is_empty() {
                identity.value().to_string()
            } else {
                e.display_name.trim().to_string()
            };

            if by_token
                .insert(
                    e.token.clone(),
                    Profile {
                        identity,
                        display_name,
                        expires_at: e.expires_at,
                    },
                )
                .is_some()
            {
                return Err(AppError::Config(format!("duplicate token '{}'", e.token)));
            }
        }

        Ok(Self {
            by_token,
            now: Utc::now,
        })
    }

    /// Load the registry from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "cannot read token registry {}: {}",
                path.display(),
                e
            ))
        })?;
        let file: TokenFile = serde_yaml::from_str(&content)?;
        Self::from_entries(file.tokens)
    }

    /// Override the clock used for expiry checks.
    pub fn with_clock(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

impl IdentityResolver for TokenRegistry {
    fn verify(&self, token: &str) -> AppResult<IdentityClaim> {
        let profile = self
            .by_token
            .get(token.trim())
            .ok_or_else(|| AppError::InvalidToken("unknown token".into()))?;

        if let Some(exp) = profile.expires_at
            && exp <= (self.now)()
        {
            return Err(AppError::InvalidToken(format!(
                "token expired at {}",
                exp.to_rfc3339()
            )));
        }

        Ok(IdentityClaim {
            subject: token.trim().to_string(),
            identity: profile.identity.clone(),
        })
    }

    fn resolve(&self, claim: &IdentityClaim) -> AppResult<ResolvedIdentity> {
        let profile = self
            .by_token
            .get(&claim.subject)
            .filter(|p| p.identity == claim.identity)
            .ok_or_else(|| AppError::InvalidToken(format!("no profile for {}", claim.identity)))?;

        Ok(ResolvedIdentity {
            identity: profile.identity.clone(),
            display_name: profile.display_name.clone(),
        })
    }
}
