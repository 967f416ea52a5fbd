use thiserror::Error;

/// Error type for token construction, signing, parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token payload: {0}")]
    InvalidPayload(String),

    #[error("Could not sign token: {0}")]
    SigningFailure(String),

    #[error("Could not parse token: {0}")]
    MalformedToken(String),

    #[error("Invalid issuer: expected {expected}, found {found:?}")]
    InvalidIssuer {
        expected: String,
        found: Option<String>,
    },

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is not yet valid")]
    TokenNotYetValid,

    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),
}

impl TokenError {
    /// True when the token itself was rejected, as opposed to a failure
    /// while producing one.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            TokenError::InvalidPayload(_) | TokenError::SigningFailure(_)
        )
    }
}
