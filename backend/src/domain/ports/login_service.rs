//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! exchange credentials for a session without knowing the backing
//! infrastructure, so handler tests can substitute a test double.

use async_trait::async_trait;

use crate::domain::{Error, Identity, IssuedSession, LoginCredentials};

/// Domain use-case port for credential verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a session token.
    ///
    /// Fails with `invalid_credentials` for an unknown email or wrong
    /// password, and with `account_disabled` for an inactive account
    /// whatever the password.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedSession, Error>;
}

/// Domain use-case port for resolving a presented token into an identity.
pub trait SessionAuthenticator: Send + Sync {
    /// Resolve the token, if any, carried by a request.
    ///
    /// Fails with `unauthenticated` when no token is present and with
    /// `invalid_token` when it is malformed, forged, or expired. The account
    /// is not re-read, so role changes apply from the next login.
    fn authenticate(&self, token: Option<&str>) -> Result<Identity, Error>;
}
