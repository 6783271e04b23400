//! Comment service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::comment,
    repositories::{
        CommentRepository, PostCommentRow, PostRepository, UserCommentRow, UserRepository,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::gate::{ensure_owner, require_identity};

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1))]
    pub comment_text: String,
}

/// Input for updating a comment. An absent text keeps the current one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentInput {
    #[validate(length(min = 1))]
    pub comment_text: Option<String>,
}

/// A bare comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub comment_text: String,
    pub created_at: DateTime<Utc>,
    pub post_id: i32,
    pub user_id: i32,
}

impl From<comment::Model> for CommentView {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            comment_text: model.comment_text,
            created_at: model.created_at.with_timezone(&Utc),
            post_id: model.post_id,
            user_id: model.user_id,
        }
    }
}

/// A comment under a post, with who wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentView {
    pub id: i32,
    pub comment_text: String,
    pub created_at: DateTime<Utc>,
    pub post_id: i32,
    pub user_id: i32,
    pub user_login: String,
    pub user_avatar_url: Option<String>,
}

impl From<PostCommentRow> for PostCommentView {
    fn from(row: PostCommentRow) -> Self {
        Self {
            id: row.id,
            comment_text: row.comment_text,
            created_at: row.created_at.with_timezone(&Utc),
            post_id: row.post_id,
            user_id: row.user_id,
            user_login: row.user_login,
            user_avatar_url: row.user_avatar_url,
        }
    }
}

/// A user's comment, with the post it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCommentView {
    pub id: i32,
    pub comment_text: String,
    pub created_at: DateTime<Utc>,
    pub post_id: i32,
    pub post_content: String,
    pub post_author_id: Option<i32>,
    pub post_author_login: Option<String>,
}

impl From<UserCommentRow> for UserCommentView {
    fn from(row: UserCommentRow) -> Self {
        Self {
            id: row.id,
            comment_text: row.comment_text,
            created_at: row.created_at.with_timezone(&Utc),
            post_id: row.post_id,
            post_content: row.post_content,
            post_author_id: row.post_author_id,
            post_author_login: row.post_author_login,
        }
    }
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
        }
    }

    /// Get one comment.
    pub async fn get(&self, id: i32) -> AppResult<CommentView> {
        Ok(self.comment_repo.get_by_id(id).await?.into())
    }

    /// Comment on a post as the caller.
    pub async fn create(
        &self,
        caller: Option<i32>,
        post_id: i32,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        let caller = require_identity(caller)?;
        input.validate()?;

        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::NotFound(format!("Post {post_id}")));
        }

        let model = comment::ActiveModel {
            comment_text: Set(input.comment_text),
            created_at: Set(Utc::now().into()),
            post_id: Set(post_id),
            user_id: Set(caller),
            ..Default::default()
        };

        let created = self.comment_repo.create(model).await?;
        tracing::debug!(comment_id = created.id, post_id, user_id = caller, "Created comment");
        Ok(created.into())
    }

    /// Edit the caller's comment.
    pub async fn update(
        &self,
        caller: Option<i32>,
        id: i32,
        input: UpdateCommentInput,
    ) -> AppResult<CommentView> {
        let caller = require_identity(caller)?;
        input.validate()?;

        let existing = self.comment_repo.get_by_id(id).await?;
        ensure_owner(caller, Some(existing.user_id), "comment")?;

        let Some(text) = input.comment_text else {
            return Ok(existing.into());
        };

        let mut active: comment::ActiveModel = existing.into();
        active.comment_text = Set(text);
        Ok(self.comment_repo.update(active).await?.into())
    }

    /// Delete the caller's comment.
    pub async fn delete(&self, caller: Option<i32>, id: i32) -> AppResult<()> {
        let caller = require_identity(caller)?;

        let existing = self.comment_repo.get_by_id(id).await?;
        ensure_owner(caller, Some(existing.user_id), "comment")?;

        self.comment_repo.delete(id).await
    }

    /// Comments under a post, newest first.
    pub async fn list_by_post(&self, post_id: i32) -> AppResult<Vec<PostCommentView>> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::NotFound(format!("Post {post_id}")));
        }

        let rows = self.comment_repo.find_by_post_with_author(post_id).await?;
        Ok(rows.into_iter().map(PostCommentView::from).collect())
    }

    /// Comments written by a user, newest first.
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<UserCommentView>> {
        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id}")));
        }

        let rows = self.comment_repo.find_by_user_with_post(user_id).await?;
        Ok(rows.into_iter().map(UserCommentView::from).collect())
    }
}
