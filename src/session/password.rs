use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{instrument, warn};

use crate::shared::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Same message for an unknown email and a wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Rejects passwords shorter than `MIN_PASSWORD_LENGTH` characters
pub fn check_password_length(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// One-way password hashing backed by Argon2id
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hasher with explicit cost parameters (memory in KiB, iterations)
    pub fn with_params(memory_kib: u32, iterations: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|e| {
            warn!(error = %e, "Invalid Argon2 parameters");
            AppError::Internal
        })?;

        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a password into a PHC string with a fresh random salt
    #[instrument(skip_all)]
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                warn!(error = %e, "Failed to hash password");
                AppError::Internal
            })
    }

    /// A stored hash that cannot be parsed never verifies
    #[instrument(skip_all)]
    pub fn verify(&self, password: &str, hashed: &str) -> bool {
        let hashed = match PasswordHash::new(hashed) {
            Ok(hashed) => hashed,
            Err(_) => return false,
        };

        self.argon
            .verify_password(password.as_bytes(), &hashed)
            .is_ok()
    }
}
