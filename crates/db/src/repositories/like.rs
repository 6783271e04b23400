//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like, post, user};
use crate::map_db_err;
use agora_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, prelude::DateTimeWithTimeZone,
};

/// A post liked by a user, with its author's login.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct UserLikeRow {
    pub post_id: i32,
    pub content: String,
    pub author_id: Option<i32>,
    pub author_login: Option<String>,
    pub media_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and post.
    pub async fn find_by_user_and_post(
        &self,
        user_id: i32,
        post_id: i32,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, user_id: i32, post_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_post(user_id, post_id)
            .await?
            .is_some())
    }

    /// Create a new like.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a like by user and post, returning how many rows went away.
    pub async fn delete_by_user_and_post(&self, user_id: i32, post_id: i32) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Posts liked by a user, most recent like first.
    pub async fn find_by_user_with_post(&self, user_id: i32) -> AppResult<Vec<UserLikeRow>> {
        Like::find()
            .select_only()
            .column(like::Column::PostId)
            .column(post::Column::Content)
            .column(post::Column::AuthorId)
            .column_as(user::Column::Login, "author_login")
            .column(post::Column::MediaUrl)
            .column(post::Column::CreatedAt)
            .join(JoinType::InnerJoin, like::Relation::Post.def())
            .join(JoinType::LeftJoin, post::Relation::Author.def())
            .filter(like::Column::UserId.eq(user_id))
            .order_by_desc(like::Column::Id)
            .into_model::<UserLikeRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    #[tokio::test]
    async fn test_has_liked() {
        let existing = like::Model {
            id: 1,
            user_id: 2,
            post_id: 3,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.has_liked(2, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_like_affects_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert_eq!(repo.delete_by_user_and_post(2, 3).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_user_with_post_orphaned_author() {
        let created_at: DateTimeWithTimeZone = Utc::now().into();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "post_id" => Value::from(3),
                    "content" => Value::from("hello"),
                    "author_id" => Value::Int(None),
                    "author_login" => Value::String(None),
                    "media_url" => Value::from("/uploads/a.png"),
                    "created_at" => Value::from(created_at),
                }]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let rows = repo.find_by_user_with_post(2).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].post_id, 3);
        assert!(rows[0].author_id.is_none());
        assert!(rows[0].author_login.is_none());
        assert_eq!(rows[0].media_url.as_deref(), Some("/uploads/a.png"));
    }
}
