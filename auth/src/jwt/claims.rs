use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Names of the framing claims. Extra claims can never override these.
pub const RESERVED_CLAIMS: [&str; 6] = ["iss", "sub", "iat", "exp", "nbf", "jti"];

/// Custom claims carried next to the framing claims.
pub type ExtraClaims = HashMap<String, ClaimValue>;

/// Scalar value of a custom claim.
///
/// Restricted to JSON scalars so that custom claims stay typed across
/// every service that reads the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ClaimValue {
    /// Get the value as a string slice when it is a string claim.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::Bool(b) => b.fmt(f),
            ClaimValue::Integer(i) => i.fmt(f),
            ClaimValue::Float(x) => x.fmt(f),
            ClaimValue::String(s) => s.fmt(f),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

/// JWT claim set as it travels inside a signed token.
///
/// Framing claims follow RFC 7519 and are optional at the type level: a
/// token read back from the wire may lack any of them, which is detected
/// by the validator rather than by deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject (user identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Custom fields, flattened into the token body
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set not before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Add a custom field. Reserved claim names are ignored.
    pub fn with_extra(mut self, key: impl ToString, value: impl Into<ClaimValue>) -> Self {
        let key = key.to_string();
        if !is_reserved(&key) {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Look up a custom claim holding a string.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(ClaimValue::as_str)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| current_timestamp > exp)
    }

    /// Check if token is used before its not-before time.
    pub fn is_premature(&self, current_timestamp: i64) -> bool {
        self.nbf.map_or(false, |nbf| current_timestamp < nbf)
    }
}

/// Whether `key` names one of the framing claims.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_CLAIMS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_expiration(1234567890)
            .with_issued_at(1234567800)
            .with_issuer("orka")
            .with_extra("role", "admin");

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iat, Some(1234567800));
        assert_eq!(claims.iss, Some("orka".to_string()));
        assert_eq!(claims.extra_str("role"), Some("admin"));
    }

    #[test]
    fn test_with_extra_ignores_reserved_names() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_extra("sub", "intruder")
            .with_extra("exp", 1_i64);

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new().with_expiration(1000);

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_premature() {
        let claims = Claims::new().with_not_before(1000);

        assert!(claims.is_premature(999));
        assert!(!claims.is_premature(1000));
        assert!(!Claims::new().is_premature(0));
    }

    #[test]
    fn test_extra_claims_are_flattened() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_extra("username", "alice")
            .with_extra("admin", false)
            .with_extra("level", 3_i64);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "user123");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["admin"], false);
        assert_eq!(json["level"], 3);
        assert!(json.get("extra").is_none());
        assert!(json.get("exp").is_none());

        let decoded: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_claim_value_accessors() {
        assert_eq!(ClaimValue::from("x").as_str(), Some("x"));
        assert_eq!(ClaimValue::from(7_i64).as_i64(), Some(7));
        assert_eq!(ClaimValue::from(true).as_bool(), Some(true));
        assert_eq!(ClaimValue::from(7_i64).as_str(), None);
        assert_eq!(ClaimValue::from(1.5).to_string(), "1.5");
    }
}
