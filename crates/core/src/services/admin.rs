//! Admin gate: the passphrase check guarding destructive operations.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use schoolboard_common::{AppError, AppResult, config::AdminConfig};

/// Admin gate holding the configured Argon2 passphrase hash.
#[derive(Clone)]
pub struct AdminGate {
    passphrase_hash: Arc<str>,
}

impl AdminGate {
    /// Create a gate from an Argon2 PHC string.
    ///
    /// Fails with `Config` if the string is not a valid hash.
    pub fn new(passphrase_hash: &str) -> AppResult<Self> {
        PasswordHash::new(passphrase_hash)
            .map_err(|e| AppError::Config(format!("Invalid admin passphrase hash: {e}")))?;

        Ok(Self {
            passphrase_hash: Arc::from(passphrase_hash),
        })
    }

    /// Create a gate from the `admin` config section.
    pub fn from_config(config: &AdminConfig) -> AppResult<Self> {
        Self::new(&config.passphrase_hash)
    }

    /// Check a passphrase. Anything but an exact match is `Forbidden`.
    pub fn check(&self, passphrase: &str) -> AppResult<()> {
        let parsed = PasswordHash::new(&self.passphrase_hash)
            .map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

        if Argon2::default()
            .verify_password(passphrase.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(())
        } else {
            tracing::debug!("Admin passphrase rejected");
            Err(AppError::Forbidden("Invalid admin passphrase".to_string()))
        }
    }
}

/// Hash a passphrase with Argon2 for the `admin.passphrase_hash` setting.
pub fn hash_passphrase(passphrase: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash passphrase: {e}")))
}
