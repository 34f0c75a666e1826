//! Tests for account administration.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, UserPersistenceError};
use crate::domain::test_fixtures::{fixed_clock, fixture_now, user};

type Service = UserAccountService<MockUserRepository, MockPasswordHasher>;

fn make_service(users: MockUserRepository, hasher: MockPasswordHasher) -> Service {
    UserAccountService::new(Arc::new(users), Arc::new(hasher), fixed_clock())
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|plaintext| Ok(PasswordHash::new(format!("hashed:{plaintext}"))));
    hasher
}

fn new_user(role: Role) -> NewUser {
    NewUser {
        email: Email::new("tec1@hospital.com").expect("email"),
        display_name: DisplayName::new("Técnico Uno").expect("name"),
        password: NewPassword::new("secret1").expect("password"),
        role,
    }
}

fn bootstrap() -> BootstrapAdmin {
    BootstrapAdmin {
        email: Email::new("admin@hospital.com").expect("email"),
        display_name: DisplayName::new("Administrador").expect("name"),
        password: NewPassword::new("admin123").expect("password"),
    }
}

#[tokio::test]
async fn create_hashes_password_and_starts_active() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user, hash| {
            user.status == RecordStatus::Activo
                && user.role == Role::Tecnico
                && user.created_at == fixture_now()
                && hash.as_str() == "hashed:secret1"
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = make_service(users, hashing_hasher());
    let created = service
        .create(new_user(Role::Tecnico))
        .await
        .expect("create succeeds");

    assert_eq!(created.email.as_ref(), "tec1@hospital.com");
    assert!(created.is_active());
}

#[tokio::test]
async fn duplicate_email_is_conflict_on_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(|_, _| Err(UserPersistenceError::conflict("email")));

    let service = make_service(users, hashing_hasher());
    let error = service
        .create(new_user(Role::Tecnico))
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("email"))
    );
}

#[tokio::test]
async fn update_rehashes_only_when_password_changes() {
    let existing = user("tec1@hospital.com", Role::Tecnico, RecordStatus::Activo);
    let id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_update()
        .withf(|_, patch| {
            patch.password_hash.is_none() && patch.role == Some(Role::Admin)
        })
        .times(1)
        .return_once(move |_, _| {
            Ok(Some(User {
                role: Role::Admin,
                ..existing
            }))
        });
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let service = make_service(users, hasher);
    let changes = UserChanges {
        role: Some(Role::Admin),
        ..UserChanges::default()
    };
    let updated = service.update(&id, changes).await.expect("update succeeds");
    assert_eq!(updated.role, Role::Admin);
}

#[tokio::test]
async fn update_with_password_stores_new_hash() {
    let existing = user("tec1@hospital.com", Role::Tecnico, RecordStatus::Activo);
    let id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_update()
        .withf(|_, patch| {
            patch
                .password_hash
                .as_ref()
                .is_some_and(|hash| hash.as_str() == "hashed:n3w-pass")
        })
        .return_once(move |_, _| Ok(Some(existing)));

    let service = make_service(users, hashing_hasher());
    let changes = UserChanges {
        password: Some(NewPassword::new("n3w-pass").expect("password")),
        ..UserChanges::default()
    };
    service.update(&id, changes).await.expect("update succeeds");
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    users.expect_set_status().return_once(|_, _| Ok(None));

    let service = make_service(users, MockPasswordHasher::new());
    let id = UserId::random();
    let get = service.get(&id).await.expect_err("absent");
    let deactivate = service.deactivate(&id).await.expect_err("absent");

    assert_eq!(get.code(), ErrorCode::NotFound);
    assert_eq!(deactivate.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn reactivate_sets_status_active() {
    let inactive = user("tec1@hospital.com", Role::Tecnico, RecordStatus::Inactivo);
    let id = inactive.id;
    let mut users = MockUserRepository::new();
    users
        .expect_set_status()
        .withf(|_, status| *status == RecordStatus::Activo)
        .times(1)
        .return_once(move |_, status| {
            Ok(Some(User {
                status,
                ..inactive
            }))
        });

    let service = make_service(users, MockPasswordHasher::new());
    let user = service.reactivate(&id).await.expect("reactivated");
    assert!(user.is_active());
}

#[tokio::test]
async fn bootstrap_skips_when_an_admin_is_active() {
    let mut users = MockUserRepository::new();
    users.expect_count_active_admins().return_once(|| Ok(1));
    users.expect_insert().times(0);

    let service = make_service(users, MockPasswordHasher::new());
    let seeded = service
        .ensure_bootstrap_admin(bootstrap())
        .await
        .expect("bootstrap check");
    assert!(seeded.is_none());
}

#[tokio::test]
async fn bootstrap_creates_admin_when_none_active() {
    let mut users = MockUserRepository::new();
    users.expect_count_active_admins().return_once(|| Ok(0));
    users
        .expect_insert()
        .withf(|user, _| user.role == Role::Admin)
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = make_service(users, hashing_hasher());
    let seeded = service
        .ensure_bootstrap_admin(bootstrap())
        .await
        .expect("bootstrap check")
        .expect("admin created");
    assert_eq!(seeded.email.as_ref(), "admin@hospital.com");
}
