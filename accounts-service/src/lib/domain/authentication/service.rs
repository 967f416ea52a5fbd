use std::sync::Arc;

use async_trait::async_trait;
use auth::ClaimValue;
use auth::CredentialService;
use auth::ExtraClaims;
use auth::PasswordHasher;
use auth::TokenError;
use auth::TokenType;
use auth::VerifiedClaims;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::Identity;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::authentication::models::TokenPair;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

const INVALID_ACCESS_TOKEN: &str = "Invalid access token";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Domain service implementing the authentication flows.
///
/// Holds no state of its own: every call combines the injected repository,
/// the credential service and the password hasher.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    credentials: Arc<CredentialService>,
    password_hasher: PasswordHasher,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `credentials` - Token issuing and validation
    pub fn new(repository: Arc<UR>, credentials: Arc<CredentialService>) -> Self {
        Self {
            repository,
            credentials,
            password_hasher: PasswordHasher::new(),
        }
    }

    fn issue_token(&self, user: &User, token_type: TokenType) -> Result<String, AuthError> {
        let payload =
            self.credentials
                .issue_payload(user.id, token_type, snapshot_claims(user));

        self.credentials.build_and_sign(&payload).map_err(|e| {
            tracing::error!(
                user_id = %user.id,
                token_type = %token_type,
                error = %e,
                "Could not issue token"
            );
            AuthError::Internal("Could not issue token".to_string())
        })
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue_token(user, TokenType::Access)?,
            refresh_token: self.issue_token(user, TokenType::Refresh)?,
        })
    }

    /// Parse and validate a presented token. Every rejection reason collapses
    /// into the same `Unauthenticated` message.
    fn verify_token(&self, token: &str, rejection: &str) -> Result<VerifiedClaims, AuthError> {
        self.credentials.parse_and_validate(token).map_err(|e| {
            tracing::warn!(error = %e, "{}", rejection);
            AuthError::Unauthenticated(rejection.to_string())
        })
    }

    fn subject_id(&self, claims: &VerifiedClaims, rejection: &str) -> Result<UserId, AuthError> {
        let subject = claims.subject().map_err(|e| {
            tracing::warn!(error = %e, "{}", rejection);
            AuthError::Unauthenticated(rejection.to_string())
        })?;

        UserId::from_string(subject).map_err(|e| {
            tracing::warn!(subject = %subject, error = %e, "{}", rejection);
            AuthError::Unauthenticated(rejection.to_string())
        })
    }

    async fn find_user(&self, id: &UserId) -> Result<User, AuthError> {
        match self.repository.find_by_id(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!(user_id = %id, "Token subject not found");
                Err(AuthError::NotFound("User not found".to_string()))
            }
            Err(e) => {
                tracing::error!(user_id = %id, error = %e, "Could not get user");
                Err(AuthError::Internal("Could not get user".to_string()))
            }
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| {
                tracing::error!(error = %e, "Could not hash password");
                AuthError::Internal("Could not hash password".to_string())
            })?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let user = self.repository.create(new_user).await.map_err(|e| match e {
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                tracing::warn!(error = %e, "Registration rejected");
                AuthError::AlreadyExists(e.to_string())
            }
            _ => {
                tracing::error!(error = %e, "Could not create user");
                AuthError::Internal("Could not create user".to_string())
            }
        })?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        self.issue_pair(&user)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError> {
        // A username that fails validation cannot belong to a stored account.
        let found = match Username::new(command.username.clone()) {
            Ok(username) => self
                .repository
                .find_by_username(&username)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Could not get user");
                    AuthError::Internal("Could not get user".to_string())
                })?,
            Err(_) => None,
        };

        let user = found.ok_or_else(|| {
            tracing::warn!(username = %command.username, "User not found");
            AuthError::NotFound("User not found".to_string())
        })?;

        let password_matches = self
            .password_hasher
            .verify(&command.password, &user.password_hash)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Could not verify password");
                AuthError::Internal("Could not verify password".to_string())
            })?;

        if !password_matches {
            tracing::warn!(username = %command.username, "Invalid password");
            return Err(AuthError::Unauthenticated("Invalid password".to_string()));
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_pair(&user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.verify_token(refresh_token, INVALID_REFRESH_TOKEN)?;
        let user_id = self.subject_id(&claims, INVALID_REFRESH_TOKEN)?;

        token_metadata(&claims).map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "{}", INVALID_REFRESH_TOKEN);
            AuthError::Unauthenticated(INVALID_REFRESH_TOKEN.to_string())
        })?;

        let user = self.find_user(&user_id).await?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");

        self.issue_token(&user, TokenType::Access)
    }

    async fn validate(&self, access_token: &str) -> Result<Identity, AuthError> {
        let claims = self.verify_token(access_token, INVALID_ACCESS_TOKEN)?;
        let user_id = self.subject_id(&claims, INVALID_ACCESS_TOKEN)?;

        let (expires, issued_at, issuer) = token_metadata(&claims).map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "{}", INVALID_ACCESS_TOKEN);
            AuthError::Unauthenticated(INVALID_ACCESS_TOKEN.to_string())
        })?;

        let user = self.find_user(&user_id).await?;

        Ok(Identity {
            subject: user.id.to_string(),
            expires,
            issued_at,
            issuer,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.to_string(),
        })
    }
}

/// Point-in-time copy of the account fields embedded into issued tokens.
fn snapshot_claims(user: &User) -> ExtraClaims {
    let mut extra = ExtraClaims::new();
    extra.insert(
        "username".to_string(),
        ClaimValue::from(user.username.as_str()),
    );
    extra.insert("email".to_string(), ClaimValue::from(user.email.as_str()));
    extra.insert("role".to_string(), ClaimValue::from(user.role.as_str()));
    extra
}

fn token_metadata(claims: &VerifiedClaims) -> Result<(i64, i64, String), TokenError> {
    Ok((
        claims.expiration()?,
        claims.issued_at()?,
        claims.issuer()?.to_string(),
    ))
}
