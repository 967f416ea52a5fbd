use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::ClaimValue;
use super::claims::Claims;
use super::claims::ExtraClaims;
use super::errors::TokenError;

/// Parses compact JWTs and checks them against the configured key and issuer.
///
/// Signature verification is part of parsing: there is no way to obtain
/// claims from a token whose signature did not verify. Time-based checks run
/// in [`TokenValidator::validate_at`] against an explicit clock so that
/// expiry and not-before share one notion of "now".
pub struct TokenValidator {
    issuer: String,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        // Only the signature and algorithm are checked by jsonwebtoken; the
        // registered claims are checked in validate_at.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            issuer: issuer.into(),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Decode a token and verify its signature.
    ///
    /// # Errors
    /// * `MalformedToken` - Token is not a JWT, uses another algorithm, or
    ///   its signature does not verify
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))
    }

    /// Validate parsed claims against the current time.
    pub fn validate(&self, claims: Claims) -> Result<VerifiedClaims, TokenError> {
        self.validate_at(claims, Utc::now().timestamp())
    }

    /// Validate parsed claims as of `now` (Unix timestamp).
    ///
    /// # Errors
    /// * `InvalidIssuer` - `iss` is absent or differs from the configured issuer
    /// * `TokenExpired` - `now` is past `exp`
    /// * `TokenNotYetValid` - `now` is before `nbf`
    pub fn validate_at(&self, claims: Claims, now: i64) -> Result<VerifiedClaims, TokenError> {
        if claims.iss.as_deref() != Some(self.issuer.as_str()) {
            return Err(TokenError::InvalidIssuer {
                expected: self.issuer.clone(),
                found: claims.iss,
            });
        }

        if claims.is_expired(now) {
            return Err(TokenError::TokenExpired);
        }

        if claims.is_premature(now) {
            return Err(TokenError::TokenNotYetValid);
        }

        Ok(VerifiedClaims(claims))
    }

    /// Parse and validate in one step.
    pub fn parse_and_validate(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let claims = self.parse(token)?;
        self.validate(claims)
    }
}

/// Claims of a token that passed signature, issuer and time checks.
///
/// Only [`TokenValidator`] constructs this type. Accessors for the framing
/// claims fail with `MissingClaim` rather than defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims(Claims);

impl VerifiedClaims {
    pub fn subject(&self) -> Result<&str, TokenError> {
        self.0
            .sub
            .as_deref()
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::MissingClaim("sub"))
    }

    pub fn issuer(&self) -> Result<&str, TokenError> {
        self.0.iss.as_deref().ok_or(TokenError::MissingClaim("iss"))
    }

    pub fn expiration(&self) -> Result<i64, TokenError> {
        self.0.exp.ok_or(TokenError::MissingClaim("exp"))
    }

    pub fn issued_at(&self) -> Result<i64, TokenError> {
        self.0.iat.ok_or(TokenError::MissingClaim("iat"))
    }

    pub fn not_before(&self) -> Option<i64> {
        self.0.nbf
    }

    pub fn token_id(&self) -> Option<&str> {
        self.0.jti.as_deref()
    }

    pub fn claim(&self, key: &str) -> Option<&ClaimValue> {
        self.0.extra.get(key)
    }

    pub fn extra(&self) -> &ExtraClaims {
        &self.0.extra
    }

    pub fn into_claims(self) -> Claims {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn sign(claims: &Claims, secret: &[u8], algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("Failed to encode token")
    }

    fn full_claims() -> Claims {
        Claims::new()
            .with_issuer("orka")
            .with_subject("user123")
            .with_issued_at(1000)
            .with_expiration(2000)
            .with_extra("role", "user")
    }

    #[test]
    fn test_parse_and_validate_round_trip() {
        let validator = TokenValidator::new(SECRET, "orka");
        let token = sign(&full_claims(), SECRET, Algorithm::HS256);

        let claims = validator.parse(&token).expect("Failed to parse token");
        let verified = validator
            .validate_at(claims, 1500)
            .expect("Failed to validate token");

        assert_eq!(verified.subject().unwrap(), "user123");
        assert_eq!(verified.issuer().unwrap(), "orka");
        assert_eq!(verified.issued_at().unwrap(), 1000);
        assert_eq!(verified.expiration().unwrap(), 2000);
        assert_eq!(
            verified.claim("role").and_then(ClaimValue::as_str),
            Some("user")
        );
    }

    #[test]
    fn test_parse_invalid_token() {
        let validator = TokenValidator::new(SECRET, "orka");

        let result = validator.parse("invalid.token.here");

        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_parse_with_wrong_secret() {
        let validator = TokenValidator::new(SECRET, "orka");
        let token = sign(
            &full_claims(),
            b"another_secret_at_least_32_bytes_long",
            Algorithm::HS256,
        );

        let result = validator.parse(&token);

        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_parse_rejects_other_algorithm() {
        let validator = TokenValidator::new(SECRET, "orka");
        let token = sign(&full_claims(), SECRET, Algorithm::HS512);

        let result = validator.parse(&token);

        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_parse_rejects_unsigned_token() {
        let validator = TokenValidator::new(SECRET, "orka");
        // {"alg":"none","typ":"JWT"}.{"iss":"orka","sub":"admin","exp":9999999999}.
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJpc3MiOiJvcmthIiwic3ViIjoiYWRtaW4iLCJleHAiOjk5OTk5OTk5OTl9.";

        let result = validator.parse(token);

        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_parse_rejects_tampered_payload() {
        let validator = TokenValidator::new(SECRET, "orka");
        let token = sign(&full_claims(), SECRET, Algorithm::HS256);
        let forged = sign(
            &full_claims().with_subject("admin"),
            b"forger_secret_at_least_32_bytes_long",
            Algorithm::HS256,
        );

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        let result = validator.parse(&parts.join("."));

        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }

    #[test]
    fn test_validate_rejects_wrong_issuer() {
        let validator = TokenValidator::new(SECRET, "B");
        let token = sign(&full_claims().with_issuer("A"), SECRET, Algorithm::HS256);

        let claims = validator.parse(&token).expect("Signature should verify");
        let result = validator.validate_at(claims, 1500);

        assert_eq!(
            result,
            Err(TokenError::InvalidIssuer {
                expected: "B".to_string(),
                found: Some("A".to_string()),
            })
        );
    }

    #[test]
    fn test_validate_rejects_missing_issuer() {
        let validator = TokenValidator::new(SECRET, "orka");
        let claims = Claims::new().with_subject("user123").with_expiration(2000);

        let result = validator.validate_at(claims, 1500);

        assert!(matches!(result, Err(TokenError::InvalidIssuer { found: None, .. })));
    }

    #[test]
    fn test_validate_expiration_boundary() {
        let validator = TokenValidator::new(SECRET, "orka");

        assert!(validator.validate_at(full_claims(), 2000).is_ok());
        assert_eq!(
            validator.validate_at(full_claims(), 2001),
            Err(TokenError::TokenExpired)
        );
    }

    #[test]
    fn test_validate_not_before() {
        let validator = TokenValidator::new(SECRET, "orka");
        let claims = full_claims().with_not_before(1200);

        assert_eq!(
            validator.validate_at(claims.clone(), 1199),
            Err(TokenError::TokenNotYetValid)
        );
        assert!(validator.validate_at(claims, 1200).is_ok());
    }

    #[test]
    fn test_accessors_report_missing_claims() {
        let validator = TokenValidator::new(SECRET, "orka");
        let claims = Claims::new().with_issuer("orka");

        let verified = validator.validate_at(claims, 1500).unwrap();

        assert_eq!(verified.subject(), Err(TokenError::MissingClaim("sub")));
        assert_eq!(verified.expiration(), Err(TokenError::MissingClaim("exp")));
        assert_eq!(verified.issued_at(), Err(TokenError::MissingClaim("iat")));
        assert_eq!(verified.issuer(), Ok("orka"));
    }

    #[test]
    fn test_empty_subject_is_missing() {
        let validator = TokenValidator::new(SECRET, "orka");
        let claims = full_claims().with_subject("");

        let verified = validator.validate_at(claims, 1500).unwrap();

        assert_eq!(verified.subject(), Err(TokenError::MissingClaim("sub")));
    }
}
