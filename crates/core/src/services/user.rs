//! User service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::{role, user},
    repositories::UserRepository,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::gate::{ensure_owner, require_identity};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 50))]
    pub login: String,

    #[validate(email, length(max = 100))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// Login credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginInput {
    pub login: String,
    pub password: String,
}

/// Input for updating a user's profile. Absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 128))]
    pub password: Option<String>,
}

/// Input for changing a password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub old_password: String,

    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub login: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserView {
    fn new(user: user::Model, role: Option<role::Model>) -> Self {
        Self {
            id: user.id,
            login: user.login,
            email: user.email,
            phone: user.phone,
            avatar_url: user.avatar_url,
            role_id: user.role_id,
            role: role.map(|r| r.name),
        }
    }
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self::new(user, None)
    }
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new user with the default role.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserView> {
        input.validate()?;

        if self
            .user_repo
            .find_by_login_or_email(&input.login, &input.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "User with this login or email already exists".to_string(),
            ));
        }

        let model = user::ActiveModel {
            login: Set(input.login),
            email: Set(input.email),
            password: Set(hash_password(&input.password)?),
            phone: Set(input.phone),
            role_id: Set(Some(role::DEFAULT_ROLE_ID)),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, login = %user.login, "Registered user");

        Ok(user.into())
    }

    /// Check credentials and return the matching user.
    pub async fn login(&self, input: LoginInput) -> AppResult<UserView> {
        if input.login.is_empty() || input.password.is_empty() {
            return Err(AppError::BadRequest(
                "Login and password are required".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_login(&input.login)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password)? {
            tracing::debug!(login = %input.login, "Rejected login");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user.into())
    }

    /// Get a user's public profile, including the role name.
    pub async fn get(&self, id: i32) -> AppResult<UserView> {
        let (user, role) = self
            .user_repo
            .find_with_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id}")))?;

        Ok(UserView::new(user, role))
    }

    /// Update the caller's own profile.
    pub async fn update(
        &self,
        caller: Option<i32>,
        id: i32,
        input: UpdateUserInput,
    ) -> AppResult<UserView> {
        let caller = require_identity(caller)?;
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;
        ensure_owner(caller, Some(user.id), "account")?;

        let mut active: user::ActiveModel = user.into();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            active.password = Set(hash_password(&password)?);
        }

        let updated = self.user_repo.update(active).await?;
        Ok(updated.into())
    }

    /// Replace the caller's password after checking the old one.
    pub async fn change_password(
        &self,
        caller: Option<i32>,
        id: i32,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        let caller = require_identity(caller)?;
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;
        ensure_owner(caller, Some(user.id), "account")?;

        if !verify_password(&input.old_password, &user.password)? {
            return Err(AppError::BadRequest("Old password is incorrect".to_string()));
        }

        let mut active: user::ActiveModel = user.into();
        active.password = Set(hash_password(&input.new_password)?);
        self.user_repo.update(active).await?;

        tracing::info!(user_id = id, "Changed password");
        Ok(())
    }

    /// Delete the caller's own account.
    pub async fn delete(&self, caller: Option<i32>, id: i32) -> AppResult<()> {
        let caller = require_identity(caller)?;

        let user = self.user_repo.get_by_id(id).await?;
        ensure_owner(caller, Some(user.id), "account")?;

        self.user_repo.delete(id).await?;
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
