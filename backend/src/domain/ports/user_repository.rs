//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    PasswordHash, RecordStatus, SearchTerm, User, UserCredentials, UserId, UserPatch,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}"; unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        Conflict { field: String } => "user repository uniqueness violated on {field}",
    }
}

/// Account storage.
///
/// Lookups by id and email return accounts in any status; only the login
/// path cares whether an account is active.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with its password hash.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its hash by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Page through accounts of any status, newest first.
    ///
    /// The search matches display name or email as a case-insensitive
    /// substring, or the role when the term names one.
    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError>;

    /// Apply a patch; `None` when the account does not exist.
    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the lifecycle status; `None` when the account does not exist.
    async fn set_status(
        &self,
        id: &UserId,
        status: RecordStatus,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Number of active administrator accounts.
    async fn count_active_admins(&self) -> Result<u64, UserPersistenceError>;
}
