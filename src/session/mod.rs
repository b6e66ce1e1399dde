// Public API - what other modules can use
pub use middleware::{jwt_auth, require_admin};
pub use password::{
    check_password_length, CredentialHasher, INVALID_CREDENTIALS, MIN_PASSWORD_LENGTH,
};
pub use token::TokenConfig;
pub use types::{SessionClaims, TokenKind};

// Internal modules
mod middleware;
mod password;
mod token;
mod types;
