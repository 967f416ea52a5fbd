//! Credential lifecycle library
//!
//! Provides the building blocks the accounts service issues tokens with:
//! - Password hashing (Argon2id)
//! - Token construction and signing (HS256 JWT)
//! - Token parsing and validation with typed claim accessors
//! - A credential service owning key, issuer and expiration policy
//!
//! The library does no logging and holds no global state; everything is
//! configured through values passed in at construction.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other_password", &hash).unwrap());
//! ```
//!
//! ## Issuing and Validating Tokens
//! ```
//! use auth::{CredentialConfig, CredentialService, ExtraClaims, TokenType};
//!
//! let service = CredentialService::new(&CredentialConfig::default());
//!
//! let payload = service.issue_payload("user123", TokenType::Access, ExtraClaims::new());
//! let token = service.build_and_sign(&payload).unwrap();
//!
//! let claims = service.parse_and_validate(&token).unwrap();
//! assert_eq!(claims.subject().unwrap(), "user123");
//! assert_eq!(claims.issuer().unwrap(), "orka");
//! ```

pub mod credentials;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use credentials::CredentialConfig;
pub use credentials::CredentialService;
pub use jwt::ClaimValue;
pub use jwt::Claims;
pub use jwt::ExtraClaims;
pub use jwt::TokenError;
pub use jwt::TokenPayload;
pub use jwt::TokenType;
pub use jwt::VerifiedClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
