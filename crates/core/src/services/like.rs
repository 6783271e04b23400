//! Like service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::like,
    repositories::{LikeRepository, PostRepository, UserLikeRow, UserRepository},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;

use crate::services::gate::require_identity;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
}

/// A like record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeView {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
}

impl From<like::Model> for LikeView {
    fn from(model: like::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            post_id: model.post_id,
        }
    }
}

/// A post the user liked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedPostView {
    pub post_id: i32,
    pub content: String,
    pub author_id: Option<i32>,
    pub author_login: Option<String>,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserLikeRow> for LikedPostView {
    fn from(row: UserLikeRow) -> Self {
        Self {
            post_id: row.post_id,
            content: row.content,
            author_id: row.author_id,
            author_login: row.author_login,
            media_url: row.media_url,
            created_at: row.created_at.with_timezone(&Utc),
        }
    }
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            user_repo,
        }
    }

    /// Like a post as the caller.
    pub async fn like(&self, caller: Option<i32>, post_id: i32) -> AppResult<LikeView> {
        let caller = require_identity(caller)?;

        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::NotFound(format!("Post {post_id}")));
        }

        if self.like_repo.has_liked(caller, post_id).await? {
            return Err(AppError::Conflict("Like already exists".to_string()));
        }

        let model = like::ActiveModel {
            user_id: Set(caller),
            post_id: Set(post_id),
            ..Default::default()
        };

        let created = self.like_repo.create(model).await?;
        tracing::debug!(post_id, user_id = caller, "Liked post");
        Ok(created.into())
    }

    /// Remove the caller's like from a post.
    pub async fn unlike(&self, caller: Option<i32>, post_id: i32) -> AppResult<()> {
        let caller = require_identity(caller)?;

        let removed = self.like_repo.delete_by_user_and_post(caller, post_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Like not found".to_string()));
        }

        tracing::debug!(post_id, user_id = caller, "Unliked post");
        Ok(())
    }

    /// The caller's like on a post.
    pub async fn get(&self, caller: Option<i32>, post_id: i32) -> AppResult<LikeView> {
        let caller = require_identity(caller)?;

        self.like_repo
            .find_by_user_and_post(caller, post_id)
            .await?
            .map(LikeView::from)
            .ok_or_else(|| AppError::NotFound("Like not found".to_string()))
    }

    /// Posts a user liked, most recent first.
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<LikedPostView>> {
        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id}")));
        }

        let rows = self.like_repo.find_by_user_with_post(user_id).await?;
        Ok(rows.into_iter().map(LikedPostView::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_post(id: i32, author_id: i32) -> post::Model {
        post::Model {
            id,
            content: "Hello".to_string(),
            media_url: None,
            share_url: None,
            created_at: Utc::now().into(),
            author_id: Some(author_id),
            community_id: None,
            topic_id: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn service(like_db: MockDatabase, post_db: MockDatabase) -> LikeService {
        LikeService::new(
            LikeRepository::new(Arc::new(like_db.into_connection())),
            PostRepository::new(Arc::new(post_db.into_connection())),
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        )
    }

    #[tokio::test]
    async fn test_like_unlike_lifecycle() {
        let post = create_test_post(1, 1);
        let like = like::Model {
            id: 10,
            user_id: 2,
            post_id: 1,
        };

        let like_db = MockDatabase::new(DatabaseBackend::Postgres)
            // first like: not yet liked, then insert
            .append_query_results([Vec::<like::Model>::new()])
            .append_query_results([[like.clone()]])
            // second like: already liked
            .append_query_results([[like]])
            .append_exec_results([exec(1), exec(0)]);
        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([[post]]);

        let service = service(like_db, post_db);

        let created = service.like(Some(2), 1).await.unwrap();
        assert_eq!(created.user_id, 2);
        assert_eq!(created.post_id, 1);

        match service.like(Some(2), 1).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Like already exists"),
            _ => panic!("Expected Conflict error"),
        }

        assert!(service.unlike(Some(2), 1).await.is_ok());

        match service.unlike(Some(2), 1).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Like not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        assert!(matches!(
            service.like(Some(2), 404).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_like_requires_identity() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        assert!(matches!(
            service.like(None, 1).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_get_callers_like() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        assert!(matches!(
            service.get(Some(2), 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
