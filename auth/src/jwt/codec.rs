use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use uuid::Uuid;

use super::claims::is_reserved;
use super::claims::Claims;
use super::errors::TokenError;
use super::payload::TokenPayload;
use super::payload::TokenType;

/// Lifetime of each token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub access: Duration,
    pub refresh: Duration,
}

impl ExpirationPolicy {
    pub fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access,
            TokenType::Refresh => self.refresh,
        }
    }
}

/// Builds claim sets from payloads and signs them into compact JWTs.
///
/// Uses HS256 (HMAC with SHA-256) with a key fixed at construction.
pub struct TokenCodec {
    issuer: String,
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    policy: ExpirationPolicy,
}

impl TokenCodec {
    /// Create a new codec.
    ///
    /// # Arguments
    /// * `secret` - Shared signing key
    /// * `issuer` - Value written to the `iss` claim of every token
    /// * `policy` - Lifetime per token type
    pub fn new(secret: &[u8], issuer: impl Into<String>, policy: ExpirationPolicy) -> Self {
        Self {
            issuer: issuer.into(),
            encoding_key: EncodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            policy,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn policy(&self) -> &ExpirationPolicy {
        &self.policy
    }

    /// Build the claim set for a payload, issued now.
    ///
    /// # Errors
    /// * `InvalidPayload` - Subject is empty or the expiration is out of range
    pub fn build(&self, payload: &TokenPayload) -> Result<Claims, TokenError> {
        self.build_at(payload, Utc::now())
    }

    /// Build the claim set for a payload as if issued at `now`.
    ///
    /// Custom claims are merged first; framing claims are written last and
    /// reserved names are dropped from the custom set, so a payload can never
    /// override issuer, subject or any timestamp.
    pub fn build_at(
        &self,
        payload: &TokenPayload,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        if payload.subject.trim().is_empty() {
            return Err(TokenError::InvalidPayload("subject is empty".to_string()));
        }

        let lifetime = self.policy.lifetime(payload.token_type);
        let expires_at = now.checked_add_signed(lifetime).ok_or_else(|| {
            TokenError::InvalidPayload(format!(
                "{} token lifetime overflows",
                payload.token_type
            ))
        })?;

        let extra = payload
            .extra_claims
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Claims {
            iss: Some(self.issuer.clone()),
            sub: Some(payload.subject.clone()),
            iat: Some(now.timestamp()),
            exp: Some(expires_at.timestamp()),
            nbf: payload.not_before.map(|nbf| nbf.timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
            extra,
        })
    }

    /// Sign a claim set into a compact token string.
    ///
    /// # Errors
    /// * `SigningFailure` - Serialization or signing failed
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }
}
