use thiserror::Error;

/// Errors surfaced by the authentication flows.
///
/// Messages are safe to return to clients. Lower-level causes are logged
/// where they occur and never carried in these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    AlreadyExists(String),
}

impl AuthError {
    /// Stable machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Internal(_) => "internal",
            AuthError::NotFound(_) => "not_found",
            AuthError::Unauthenticated(_) => "unauthenticated",
            AuthError::AlreadyExists(_) => "already_exists",
        }
    }
}
