use std::fmt;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Username;

/// Command to register a new account with validated identity fields.
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(username: Username, email: EmailAddress, password: String) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to log in. The username is kept raw: a malformed username simply
/// never matches a stored account.
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity behind a valid access token.
///
/// Token metadata comes from the token; username, email and role come from
/// the stored account as it is now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub expires: i64,
    pub issued_at: i64,
    pub issuer: String,
    pub username: String,
    pub email: String,
    pub role: String,
}
