//! Role and ownership checks.
//!
//! Both checks are pure and fail with the same generic message so that a
//! denied caller learns nothing about which rule rejected them.

use super::{Error, Identity, Role, UserId};

/// Roles allowed to manage equipment and their own maintenance records.
pub const STAFF: &[Role] = &[Role::Admin, Role::Tecnico];
/// Roles allowed to manage accounts and soft-delete inventory.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

const DENIED: &str = "insufficient permission";

/// Require the caller's role to be in `permitted`.
///
/// # Examples
/// ```
/// use bitacora::domain::authorization::{require_role, ADMIN_ONLY};
/// use bitacora::domain::{DisplayName, ErrorCode, Identity, Role, UserId};
///
/// let tech = Identity {
///     user_id: UserId::random(),
///     display_name: DisplayName::new("Luis").unwrap(),
///     role: Role::Tecnico,
/// };
/// let err = require_role(&tech, ADMIN_ONLY).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn require_role(identity: &Identity, permitted: &[Role]) -> Result<(), Error> {
    if permitted.contains(&identity.role) {
        Ok(())
    } else {
        Err(Error::forbidden(DENIED))
    }
}

/// Require the caller to be an administrator or the record's author.
pub fn require_owner_or_admin(identity: &Identity, author: &UserId) -> Result<(), Error> {
    if identity.is_admin() || identity.user_id == *author {
        Ok(())
    } else {
        Err(Error::forbidden(DENIED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, ErrorCode};
    use rstest::{fixture, rstest};

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: UserId::random(),
            display_name: DisplayName::new("Ana Torres").expect("valid name"),
            role,
        }
    }

    #[fixture]
    fn author() -> UserId {
        UserId::random()
    }

    #[rstest]
    #[case(Role::Admin, STAFF, true)]
    #[case(Role::Tecnico, STAFF, true)]
    #[case(Role::Admin, ADMIN_ONLY, true)]
    #[case(Role::Tecnico, ADMIN_ONLY, false)]
    fn role_check_matches_permitted_set(
        #[case] role: Role,
        #[case] permitted: &[Role],
        #[case] allowed: bool,
    ) {
        let result = require_role(&identity(role), permitted);
        assert_eq!(result.is_ok(), allowed);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::Forbidden);
            assert_eq!(err.message(), DENIED);
        }
    }

    #[rstest]
    fn admin_passes_ownership_for_any_record(author: UserId) {
        assert!(require_owner_or_admin(&identity(Role::Admin), &author).is_ok());
    }

    #[rstest]
    fn author_passes_ownership(author: UserId) {
        let mut caller = identity(Role::Tecnico);
        caller.user_id = author;
        assert!(require_owner_or_admin(&caller, &author).is_ok());
    }

    #[rstest]
    fn other_technician_is_denied_with_generic_message(author: UserId) {
        let err = require_owner_or_admin(&identity(Role::Tecnico), &author)
            .expect_err("non-owner denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), DENIED);
    }
}
