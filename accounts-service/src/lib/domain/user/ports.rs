use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Persistence operations for the account aggregate.
///
/// Uniqueness of username and email is enforced here, by the storage
/// implementation, not by callers.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Arguments
    /// * `user` - Validated username, email and password hash
    ///
    /// # Returns
    /// Stored user with id, role and timestamps assigned
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Update an existing user. `updated_at` is refreshed by the repository.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;

    /// Page through all users, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, UserError>;

    /// Number of stored users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn count(&self) -> Result<i64, UserError>;

    /// Users matching every criterion of `filter`, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn filter(&self, filter: &UserFilter) -> Result<Vec<User>, UserError>;
}
