//! In-memory [`UserRepository`].

use std::cmp::Reverse;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    PasswordHash, RecordStatus, Role, SearchTerm, User, UserCredentials, UserId, UserPatch,
};

use super::{SharedTables, paginate};

/// Account table held in process memory.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    tables: SharedTables,
}

impl InMemoryUserRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn matches_search(user: &User, term: &SearchTerm) -> bool {
    term.matches(user.display_name.as_ref())
        || term.matches(user.email.as_ref())
        || term.role() == Some(user.role)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|(existing, _)| existing.email == user.email)
        {
            return Err(UserPersistenceError::conflict("email"));
        }
        tables
            .users
            .insert(user.id, (user.clone(), password_hash.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).map(|(user, _)| user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|(user, _)| user.email.as_ref() == email)
            .map(|(user, hash)| UserCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<User> = tables
            .users
            .values()
            .map(|(user, _)| user)
            .filter(|user| search.as_ref().is_none_or(|term| matches_search(user, term)))
            .cloned()
            .collect();
        rows.sort_by_key(|user| Reverse((user.created_at, user.id)));
        Ok(paginate(rows, page).with_search(search.map(|term| term.as_str().to_owned())))
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &patch.email {
            let taken = tables
                .users
                .values()
                .any(|(other, _)| other.id != *id && other.email == *email);
            if taken {
                return Err(UserPersistenceError::conflict("email"));
            }
        }
        let Some((user, hash)) = tables.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(email) = &patch.email {
            user.email = email.clone();
        }
        if let Some(name) = &patch.display_name {
            user.display_name = name.clone();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(new_hash) = &patch.password_hash {
            *hash = new_hash.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn set_status(
        &self,
        id: &UserId,
        status: RecordStatus,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(id).map(|(user, _)| {
            user.status = status;
            user.clone()
        }))
    }

    async fn count_active_admins(&self) -> Result<u64, UserPersistenceError> {
        let tables = self.tables.read().await;
        let count = tables
            .users
            .values()
            .filter(|(user, _)| user.role == Role::Admin && user.is_active())
            .count();
        Ok(count as u64)
    }
}
