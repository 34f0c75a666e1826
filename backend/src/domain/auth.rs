//! Authentication primitives: login credentials, identities, and sessions.
//!
//! Inbound payload parsing stays outside the domain; handlers build these
//! types through validating constructors before calling a port.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{DisplayName, Role, UserId};

/// Lifetime of an issued session token.
pub const SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the credential verifier.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased, and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use bitacora::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Hospital.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "admin@hospital.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for account lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Authenticated caller derived from a verified session token.
///
/// The role is a snapshot taken at login; role changes and deactivation
/// take effect for a caller only once their current token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account identifier.
    pub user_id: UserId,
    /// Display name at login time.
    pub display_name: DisplayName,
    /// Role at login time.
    pub role: Role,
}

impl Identity {
    /// Whether the caller holds [`Role::Admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Signed, opaque session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encoded token for transport.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(**redacted**)")
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Token to hand back to the client.
    pub token: SessionToken,
    /// Identity encoded in the token.
    pub identity: Identity,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ana@hospital.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ANA@hospital.com  ", " spaced secret ")]
    #[case("luis@hospital.com", "correct horse battery staple")]
    fn valid_credentials_normalise_email(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), email.trim().to_lowercase());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = LoginCredentials::try_from_parts("ana@hospital.com", "hunter22")
            .expect("valid inputs");
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn session_ttl_is_eight_hours() {
        assert_eq!(SESSION_TTL.as_secs(), 28_800);
    }
}
