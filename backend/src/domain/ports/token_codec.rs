//! Port for signing and verifying session tokens.
use chrono::{DateTime, Utc};

use crate::domain::{Identity, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// The token could not be parsed or its signature did not verify.
        Invalid { message: String } => "session token rejected: {message}",
        /// The token verified but is past its expiry.
        Expired => "session token expired",
        /// Signing a new token failed.
        Encoding { message: String } => "session token could not be issued: {message}",
    }
}

/// Stateless session token signer.
///
/// Implementations embed the identity and an expiry instant, and compare the
/// expiry against the `now` they are handed rather than reading a clock.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `identity` valid until `expires_at`.
    fn issue(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionToken, TokenCodecError>;

    /// Verify a token and recover its identity.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenCodecError>;
}
