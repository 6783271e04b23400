//! Ownership and role checks applied before every mutation.
//!
//! Callers are identified by the user ID the client asserts on each request.
//! Services call these helpers in a fixed order: [`require_identity`] first,
//! then load the target (which may fail with `NotFound`), then
//! [`ensure_owner`] before writing anything.

use agora_common::{AppError, AppResult};
use agora_db::{entities::role, repositories::UserRepository};

/// Resolve the acting identity, or fail with `Unauthenticated`.
pub const fn require_identity(caller: Option<i32>) -> AppResult<i32> {
    match caller {
        Some(id) => Ok(id),
        None => Err(AppError::Unauthenticated),
    }
}

/// Check that `caller` owns a resource whose recorded owner is `owner`.
///
/// A resource without an owner (author deleted) can't be mutated by anyone.
pub fn ensure_owner(caller: i32, owner: Option<i32>, resource: &str) -> AppResult<()> {
    if owner == Some(caller) {
        return Ok(());
    }

    tracing::debug!(caller, ?owner, resource, "Ownership check failed");
    Err(AppError::Forbidden(format!(
        "You are not the owner of this {resource}"
    )))
}

/// Resolve the identity and require it to hold the admin role.
pub async fn require_admin(users: &UserRepository, caller: Option<i32>) -> AppResult<i32> {
    let caller = require_identity(caller)?;

    let is_admin = users
        .find_by_id(caller)
        .await?
        .is_some_and(|user| user.role_id == Some(role::ADMIN_ROLE_ID));

    if is_admin {
        Ok(caller)
    } else {
        Err(AppError::Forbidden("Administrator role required".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: i32, role_id: i32) -> user::Model {
        user::Model {
            id,
            login: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password: String::new(),
            phone: None,
            avatar_url: None,
            role_id: Some(role_id),
        }
    }

    #[test]
    fn test_require_identity() {
        assert_eq!(require_identity(Some(3)).unwrap(), 3);
        assert!(matches!(
            require_identity(None),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(1, Some(1), "post").is_ok());

        match ensure_owner(2, Some(1), "comment") {
            Err(AppError::Forbidden(msg)) => assert!(msg.contains("comment")),
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[test]
    fn test_orphaned_resource_is_owned_by_nobody() {
        assert!(matches!(
            ensure_owner(1, None, "post"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_require_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(1, role::ADMIN_ROLE_ID)]])
                .append_query_results([[create_test_user(2, role::DEFAULT_ROLE_ID)]])
                .into_connection(),
        );
        let users = UserRepository::new(db);

        assert_eq!(require_admin(&users, Some(1)).await.unwrap(), 1);
        assert!(matches!(
            require_admin(&users, Some(2)).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_require_admin_without_identity() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let users = UserRepository::new(db);

        assert!(matches!(
            require_admin(&users, None).await,
            Err(AppError::Unauthenticated)
        ));
    }
}
