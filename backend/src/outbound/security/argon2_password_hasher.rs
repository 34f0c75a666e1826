//! Argon2id password hashing.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier, SaltString,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// [`PasswordHasher`] producing PHC strings with default Argon2id
/// parameters and a fresh random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Hasher with the library's recommended parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = PhcString::new(hash.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("Secreta123").expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("Secreta123", &hash).expect("verify"));
        assert!(!hasher.verify("secreta123", &hash).expect("verify"));
    }

    #[test]
    fn salts_every_hash() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("Secreta123").expect("hash");
        let second = hasher.hash("Secreta123").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        let error = hasher
            .verify("Secreta123", &PasswordHash::new("plaintext"))
            .expect_err("malformed");
        assert!(matches!(error, PasswordHasherError::MalformedHash { .. }));
    }
}
