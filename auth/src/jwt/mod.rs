pub mod claims;
pub mod codec;
pub mod errors;
pub mod payload;
pub mod validator;

pub use claims::ClaimValue;
pub use claims::Claims;
pub use claims::ExtraClaims;
pub use codec::ExpirationPolicy;
pub use codec::TokenCodec;
pub use errors::TokenError;
pub use payload::TokenPayload;
pub use payload::TokenType;
pub use validator::TokenValidator;
pub use validator::VerifiedClaims;
