//! Driving port for account administration.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, NewUser, SearchTerm, User, UserChanges, UserId};

/// Account administration use-cases. Callers are expected to be
/// administrators; the role check happens at the route.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an active account. A taken email is a `conflict` on `email`.
    async fn create(&self, new_user: NewUser) -> Result<User, Error>;

    /// Fetch an account in any status.
    async fn get(&self, id: &UserId) -> Result<User, Error>;

    /// Page through all accounts, newest first.
    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// Change name, email, role, or password.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Mark an account `INACTIVO`.
    async fn deactivate(&self, id: &UserId) -> Result<User, Error>;

    /// Return an `INACTIVO` account to `ACTIVO`.
    async fn reactivate(&self, id: &UserId) -> Result<User, Error>;
}
