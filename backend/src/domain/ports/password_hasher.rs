//! Port for one-way password hashing.
use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Producing a hash failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted, slow password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Compare a plaintext password with a stored hash in constant time.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
