use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::claims::ClaimValue;
use super::claims::ExtraClaims;

/// Kind of token being issued. Only selects the expiration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to token construction.
///
/// A payload is built once per issuance and consumed by the codec; the
/// issuer, timestamps and token id are added there.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub subject: String,
    pub not_before: Option<DateTime<Utc>>,
    pub token_type: TokenType,
    pub extra_claims: ExtraClaims,
}

impl TokenPayload {
    /// Create a payload for `subject` without not-before or custom claims.
    pub fn new(subject: impl ToString, token_type: TokenType) -> Self {
        Self {
            subject: subject.to_string(),
            not_before: None,
            token_type,
            extra_claims: ExtraClaims::new(),
        }
    }

    /// Set the earliest instant at which the token is accepted.
    pub fn with_not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Add a custom claim.
    pub fn with_claim(mut self, key: impl ToString, value: impl Into<ClaimValue>) -> Self {
        self.extra_claims.insert(key.to_string(), value.into());
        self
    }

    /// Replace all custom claims.
    pub fn with_claims(mut self, extra_claims: ExtraClaims) -> Self {
        self.extra_claims = extra_claims;
        self
    }
}
