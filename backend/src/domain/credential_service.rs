//! Credential verification and session issuance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, TokenCodec, TokenCodecError,
    UserRepository,
};
use crate::domain::service_support::{add_duration, map_user_error};
use crate::domain::{Error, Identity, IssuedSession, LoginCredentials, SESSION_TTL};

/// Exchanges an email and password for a signed session token.
///
/// Checks run in a fixed order: unknown email, then inactive account, then
/// password. An inactive account is therefore reported as disabled whether
/// or not the password was right.
#[derive(Clone)]
pub struct CredentialService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> CredentialService<U, H, T> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password verification failed: {error}"))
}

fn map_token_error(error: TokenCodecError) -> Error {
    Error::internal(format!("session token could not be issued: {error}"))
}

#[async_trait]
impl<U, H, T> LoginService for CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedSession, Error> {
        let Some(account) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::invalid_credentials());
        };

        if !account.user.is_active() {
            return Err(Error::account_disabled());
        }

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::invalid_credentials());
        }

        let identity = Identity {
            user_id: account.user.id,
            display_name: account.user.display_name,
            role: account.user.role,
        };
        let issued_at = self.clock.utc();
        let expires_at = add_duration(issued_at, SESSION_TTL)?;
        let token = self
            .tokens
            .issue(&identity, issued_at, expires_at)
            .map_err(map_token_error)?;

        info!(user_id = %identity.user_id, role = %identity.role, "session issued");
        Ok(IssuedSession {
            token,
            identity,
            expires_at,
        })
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
