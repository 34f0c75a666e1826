//! Account administration and bootstrap seeding.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::ports::{PasswordHasher, PasswordHasherError, UserAccounts, UserRepository};
use crate::domain::service_support::map_user_error;
use crate::domain::{
    DisplayName, Email, Error, ErrorCode, NewPassword, NewUser, PasswordHash, RecordStatus, Role,
    SearchTerm, User, UserChanges, UserId, UserPatch,
};

/// Administrator account created at startup when none is active.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    /// Login email.
    pub email: Email,
    /// Display name.
    pub display_name: DisplayName,
    /// Initial password.
    pub password: NewPassword,
}

/// Implements [`UserAccounts`] over a repository and a password hasher.
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> UserAccountService<U, H> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

impl<U, H> UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn hash(&self, password: &NewPassword) -> Result<PasswordHash, Error> {
        self.hasher
            .hash(password.expose())
            .map_err(map_hasher_error)
    }

    async fn transition(&self, id: &UserId, status: RecordStatus) -> Result<User, Error> {
        let user = self
            .users
            .set_status(id, status)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)?;
        info!(user_id = %id, %status, "user status changed");
        Ok(user)
    }

    /// Create `admin` when no active administrator exists.
    ///
    /// Returns the created account, or `None` when seeding was unnecessary.
    /// An existing account holding the bootstrap email is left untouched.
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: BootstrapAdmin,
    ) -> Result<Option<User>, Error> {
        let active_admins = self
            .users
            .count_active_admins()
            .await
            .map_err(map_user_error)?;
        if active_admins > 0 {
            return Ok(None);
        }

        let email = admin.email.clone();
        let new_user = NewUser {
            email: admin.email,
            display_name: admin.display_name,
            password: admin.password,
            role: Role::Admin,
        };
        match self.create(new_user).await {
            Ok(user) => {
                info!(email = %user.email, "bootstrap administrator created");
                Ok(Some(user))
            }
            Err(error) if error.code() == ErrorCode::Conflict => {
                warn!(%email, "bootstrap email taken by a non-admin account; skipping seed");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

#[async_trait]
impl<U, H> UserAccounts for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let password_hash = self.hash(&new_user.password)?;
        let user = User {
            id: UserId::random(),
            email: new_user.email,
            display_name: new_user.display_name,
            role: new_user.role,
            status: RecordStatus::Activo,
            created_at: self.clock.utc(),
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<User>, Error> {
        self.users.list(search, page).await.map_err(map_user_error)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let password_hash = changes
            .password
            .as_ref()
            .map(|password| self.hash(password))
            .transpose()?;
        let patch = UserPatch {
            email: changes.email,
            display_name: changes.display_name,
            role: changes.role,
            password_hash,
        };
        self.users
            .update(id, &patch)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }

    async fn deactivate(&self, id: &UserId) -> Result<User, Error> {
        self.transition(id, RecordStatus::Inactivo).await
    }

    async fn reactivate(&self, id: &UserId) -> Result<User, Error> {
        self.transition(id, RecordStatus::Activo).await
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
