//! User accounts, roles, and their validated field types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{RecordStatus, UserId};

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 120;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum allowed length for a new password.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors raised by user field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Display name was blank.
    #[error("name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded [`DISPLAY_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Email address failed the shape check.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Lower bound.
        min: usize,
    },
    /// Role outside the permitted set.
    #[error("role must be ADMIN or TECNICO")]
    UnknownRole,
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Technician; may manage equipment and their own maintenance records.
    #[default]
    Tecnico,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Tecnico];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Tecnico => "TECNICO",
        }
    }

    /// Match a free-text term against role names ignoring case.
    ///
    /// ```
    /// use bitacora::domain::Role;
    ///
    /// assert_eq!(Role::match_term(" admin "), Some(Role::Admin));
    /// assert_eq!(Role::match_term("adm"), None);
    /// ```
    #[must_use]
    pub fn match_term(term: &str) -> Option<Self> {
        let term = term.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(term))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or(UserValidationError::UnknownRole)
    }
}

/// Human readable name shown next to maintenance records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised (trimmed, lower-cased) email address used as the login key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// ```
    /// use bitacora::domain::Email;
    ///
    /// let email = Email::new("  Admin@Hospital.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "admin@hospital.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.len() > EMAIL_MAX || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = !domain.contains('@')
            && domain
                .split('.')
                .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || !domain_ok {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Plaintext password accepted for a new account or a password change.
///
/// The buffer is zeroed on drop and never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate the minimum length.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the plaintext for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(**redacted**)")
    }
}

/// Stored password hash in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a password hasher.
    #[must_use]
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string for verification or storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// User account read model. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: Email,
    /// Name shown in the UI and on maintenance records.
    pub display_name: DisplayName,
    /// Granted role.
    pub role: Role,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the account may log in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Account record as seen by the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Account read model.
    pub user: User,
    /// Stored password hash.
    pub password_hash: PasswordHash,
}

/// Validated input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: Email,
    /// Display name.
    pub display_name: DisplayName,
    /// Initial password.
    pub password: NewPassword,
    /// Granted role; defaults to [`Role::Tecnico`].
    pub role: Role,
}

/// Validated partial update for an account. Status is never part of it.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// Replacement email.
    pub email: Option<Email>,
    /// Replacement display name.
    pub display_name: Option<DisplayName>,
    /// Replacement role.
    pub role: Option<Role>,
    /// Replacement password; re-hashed before storage.
    pub password: Option<NewPassword>,
}

/// Persistence-ready form of [`UserChanges`] with the password hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement email.
    pub email: Option<Email>,
    /// Replacement display name.
    pub display_name: Option<DisplayName>,
    /// Replacement role.
    pub role: Option<Role>,
    /// Replacement password hash.
    pub password_hash: Option<PasswordHash>,
}

#[cfg(test)]
mod tests;
