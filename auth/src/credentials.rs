use chrono::Duration;
use chrono::Utc;

use crate::jwt::ExpirationPolicy;
use crate::jwt::ExtraClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenPayload;
use crate::jwt::TokenType;
use crate::jwt::TokenValidator;
use crate::jwt::VerifiedClaims;

/// Signing configuration, fixed for the lifetime of the process.
///
/// # Security Notes
/// The `Default` values exist for local development only. A deployment that
/// leaves them in place signs tokens with a publicly known key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialConfig {
    pub issuer: String,
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl CredentialConfig {
    pub const DEFAULT_ISSUER: &'static str = "orka";
    pub const DEFAULT_SECRET: &'static str = "secret";
    pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
    pub const DEFAULT_REFRESH_TTL_SECS: i64 = 24 * 3600;
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            issuer: Self::DEFAULT_ISSUER.to_string(),
            secret: Self::DEFAULT_SECRET.to_string(),
            access_ttl: Duration::seconds(Self::DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(Self::DEFAULT_REFRESH_TTL_SECS),
        }
    }
}

/// Issues and checks signed credentials.
///
/// Owns the signing key, issuer and expiration policy; callers only ever see
/// payloads going in and token strings or verified claims coming out.
pub struct CredentialService {
    codec: TokenCodec,
    validator: TokenValidator,
}

impl CredentialService {
    pub fn new(config: &CredentialConfig) -> Self {
        let policy = ExpirationPolicy {
            access: config.access_ttl,
            refresh: config.refresh_ttl,
        };

        Self {
            codec: TokenCodec::new(config.secret.as_bytes(), config.issuer.clone(), policy),
            validator: TokenValidator::new(config.secret.as_bytes(), config.issuer.clone()),
        }
    }

    /// Create a payload for `subject`, valid from now.
    pub fn issue_payload(
        &self,
        subject: impl ToString,
        token_type: TokenType,
        extra_claims: ExtraClaims,
    ) -> TokenPayload {
        TokenPayload::new(subject, token_type)
            .with_not_before(Utc::now())
            .with_claims(extra_claims)
    }

    /// Build the claim set for `payload` and sign it.
    ///
    /// # Errors
    /// * `InvalidPayload` - Payload cannot be turned into claims
    /// * `SigningFailure` - Signing failed
    pub fn build_and_sign(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let claims = self.codec.build(payload)?;
        self.codec.sign(&claims)
    }

    /// Verify a token string and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Not decodable or bad signature
    /// * `InvalidIssuer`, `TokenExpired`, `TokenNotYetValid` - Claims rejected
    pub fn parse_and_validate(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        self.validator.parse_and_validate(token)
    }

    pub fn issuer(&self) -> &str {
        self.codec.issuer()
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jwt::ClaimValue;

    fn config(issuer: &str) -> CredentialConfig {
        CredentialConfig {
            issuer: issuer.to_string(),
            secret: "test_secret_key_at_least_32_bytes!".to_string(),
            access_ttl: Duration::seconds(1),
            refresh_ttl: Duration::seconds(60),
        }
    }

    fn user_claims() -> ExtraClaims {
        let mut extra = ExtraClaims::new();
        extra.insert("username".to_string(), ClaimValue::from("alice"));
        extra.insert("role".to_string(), ClaimValue::from("user"));
        extra
    }

    #[test]
    fn test_default_config() {
        let config = CredentialConfig::default();

        assert_eq!(config.issuer, "orka");
        assert_eq!(config.secret, "secret");
        assert_eq!(config.access_ttl.num_seconds(), 3600);
        assert_eq!(config.refresh_ttl.num_seconds(), 86400);
    }

    #[test]
    fn test_build_sign_parse_validate() {
        let service = CredentialService::new(&config("orka"));
        let payload = service.issue_payload("user123", TokenType::Refresh, user_claims());

        let token = service
            .build_and_sign(&payload)
            .expect("Failed to sign token");
        let verified = service
            .parse_and_validate(&token)
            .expect("Failed to validate token");

        assert_eq!(verified.subject().unwrap(), "user123");
        assert_eq!(verified.issuer().unwrap(), "orka");
        assert_eq!(
            verified.expiration().unwrap() - verified.issued_at().unwrap(),
            60
        );
        assert!(verified.not_before().is_some());
        assert_eq!(
            verified.claim("username").and_then(ClaimValue::as_str),
            Some("alice")
        );
    }

    #[test]
    fn test_expiration_boundary() {
        let service = CredentialService::new(&config("orka"));
        let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let payload = TokenPayload::new("user123", TokenType::Access).with_not_before(issued_at);

        let claims = service.codec().build_at(&payload, issued_at).unwrap();
        let token = service.codec().sign(&claims).unwrap();

        // Timestamps are whole seconds: build+0.5s is still the issuing second.
        let parsed = service.validator().parse(&token).unwrap();
        assert_eq!(parsed.exp, Some(issued_at.timestamp() + 1));
        assert!(service
            .validator()
            .validate_at(parsed.clone(), issued_at.timestamp())
            .is_ok());

        // Still accepted at exactly `exp`.
        assert!(service
            .validator()
            .validate_at(parsed.clone(), issued_at.timestamp() + 1)
            .is_ok());

        let result = service
            .validator()
            .validate_at(parsed, issued_at.timestamp() + 2);
        assert_eq!(result, Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_issuer_mismatch_with_shared_key() {
        let signer = CredentialService::new(&config("A"));
        let checker = CredentialService::new(&config("B"));
        let payload = signer.issue_payload("user123", TokenType::Refresh, ExtraClaims::new());

        let token = signer.build_and_sign(&payload).unwrap();
        let result = checker.parse_and_validate(&token);

        assert!(matches!(result, Err(TokenError::InvalidIssuer { .. })));
        // The signature itself verified.
        assert!(checker.validator().parse(&token).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = CredentialService::new(&config("orka"));
        let issued_at = Utc::now() - Duration::seconds(10);
        let payload = TokenPayload::new("user123", TokenType::Access);

        let claims = service.codec().build_at(&payload, issued_at).unwrap();
        let token = service.codec().sign(&claims).unwrap();

        assert_eq!(
            service.parse_and_validate(&token),
            Err(TokenError::TokenExpired)
        );
    }

    #[test]
    fn test_future_not_before_is_rejected() {
        let service = CredentialService::new(&config("orka"));
        let payload = TokenPayload::new("user123", TokenType::Refresh)
            .with_not_before(Utc::now() + Duration::seconds(30));

        let token = service.build_and_sign(&payload).unwrap();

        assert_eq!(
            service.parse_and_validate(&token),
            Err(TokenError::TokenNotYetValid)
        );
    }
}
