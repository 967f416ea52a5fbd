use async_trait::async_trait;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::Identity;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::authentication::models::TokenPair;

/// Port for the authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and issue its first token pair.
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email is taken
    /// * `Internal` - Hashing, storage or signing failed
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError>;

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `Unauthenticated` - Password does not match
    /// * `Internal` - Storage or signing failed
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token rejected for any reason
    /// * `NotFound` - Token subject no longer exists
    /// * `Internal` - Storage or signing failed
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Resolve an access token to the identity it asserts.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token rejected or missing a framing claim
    /// * `NotFound` - Token subject no longer exists
    /// * `Internal` - Storage failed
    async fn validate(&self, access_token: &str) -> Result<Identity, AuthError>;
}
