//! PostgreSQL-backed `UserRepository` adapter using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, Email, PasswordHash, RecordStatus, Role, SearchTerm, User, UserCredentials,
    UserId, UserPatch,
};

use super::diesel_basic_error_mapping::{DbFailure, map_basic_pool_error};
use super::diesel_helpers::{count_to_u64, decode_column, page_limit, page_offset};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

type UserFilter = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(&error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match DbFailure::from(error) {
        DbFailure::Unique(constraint) if constraint == EMAIL_CONSTRAINT => {
            UserPersistenceError::conflict("email")
        }
        other => other.resolve(UserPersistenceError::query, UserPersistenceError::connection),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    Ok(User {
        id: UserId::from_uuid(row.id),
        email: decode_column("email", &row.email, |raw| Email::new(raw))
            .map_err(UserPersistenceError::query)?,
        display_name: decode_column("display_name", &row.display_name, |raw| {
            DisplayName::new(raw)
        })
            .map_err(UserPersistenceError::query)?,
        role: decode_column("role", &row.role, str::parse::<Role>)
            .map_err(UserPersistenceError::query)?,
        status: decode_column("status", &row.status, str::parse::<RecordStatus>)
            .map_err(UserPersistenceError::query)?,
        created_at: row.created_at,
    })
}

fn search_filter(term: &SearchTerm) -> UserFilter {
    let pattern = term.like_pattern();
    let text = users::display_name
        .ilike(pattern.clone())
        .or(users::email.ilike(pattern));
    match term.role() {
        Some(role) => Box::new(text.or(users::role.eq(role.as_str()))),
        None => Box::new(text),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            display_name: user.display_name.as_ref(),
            password_hash: password_hash.as_str(),
            role: user.role.as_str(),
            status: user.status.as_str(),
            created_at: user.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let password_hash = PasswordHash::new(row.password_hash.clone());
            row_to_user(row).map(|user| UserCredentials {
                user,
                password_hash,
            })
        })
        .transpose()
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = users::table.select(diesel::dsl::count_star()).into_boxed();
        let mut rows_query = users::table
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.desc()))
            .into_boxed();
        if let Some(term) = &search {
            count_query = count_query.filter(search_filter(term));
            rows_query = rows_query.filter(search_filter(term));
        }

        let total = count_query
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = rows_query
            .limit(page_limit(page))
            .offset(page_offset(page))
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let data = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(data, count_to_u64(total), page)
            .with_search(search.map(|term| term.as_str().to_owned())))
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        let changes = UserUpdate {
            email: patch.email.as_ref().map(AsRef::as_ref),
            display_name: patch.display_name.as_ref().map(AsRef::as_ref),
            role: patch.role.map(Role::as_str),
            password_hash: patch.password_hash.as_ref().map(PasswordHash::as_str),
        };
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn set_status(
        &self,
        id: &UserId,
        status: RecordStatus,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::status.eq(status.as_str()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn count_active_admins(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = users::table
            .filter(users::role.eq(Role::Admin.as_str()))
            .filter(users::status.eq(RecordStatus::Activo.as_str()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u64(count))
    }
}

#[cfg(test)]
mod tests {
    //! Row decoding and error mapping; query behaviour is covered by the
    //! in-memory adapter suites since no database is started here.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn row(role: &str, status: &str) -> UserRow {
        UserRow {
            id: Uuid::nil(),
            email: "ana@hospital.com".to_owned(),
            display_name: "Ana Torres".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA".to_owned(),
            role: role.to_owned(),
            status: status.to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 5, 8, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[test]
    fn decodes_valid_row() {
        let user = row_to_user(row("TECNICO", "ACTIVO")).expect("valid row");
        assert_eq!(user.role, Role::Tecnico);
        assert_eq!(user.email.as_ref(), "ana@hospital.com");
        assert!(user.is_active());
    }

    #[rstest]
    #[case("ROOT", "ACTIVO")]
    #[case("ADMIN", "BORRADO")]
    fn corrupt_enum_columns_are_query_errors(#[case] role: &str, #[case] status: &str) {
        let error = row_to_user(row(role, status)).expect_err("corrupt row");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::Checkout("timed out".to_owned()));
        assert_eq!(error, UserPersistenceError::connection("timed out"));
    }

    #[rstest]
    fn missing_row_is_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
