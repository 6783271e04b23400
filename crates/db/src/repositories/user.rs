//! User repository.

use std::sync::Arc;

use crate::entities::{Role, User, role, user};
use crate::map_db_err;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id}")))
    }

    /// Check whether a user exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = User::find_by_id(id)
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    /// Find a user by exact login.
    pub async fn find_by_login(&self, login: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Login.eq(login))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find any user holding the given login or the given email.
    pub async fn find_by_login_or_email(
        &self,
        login: &str,
        email: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Login.eq(login))
                    .add(user::Column::Email.eq(email)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user together with their role.
    pub async fn find_with_role(
        &self,
        id: i32,
    ) -> AppResult<Option<(user::Model, Option<role::Model>)>> {
        User::find_by_id(id)
            .find_also_related(Role)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a user. Comments, likes and subscriptions go with it; posts stay
    /// behind without an author.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User {id}")));
        }
        Ok(())
    }
}
