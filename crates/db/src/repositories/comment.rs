//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment, post, user};
use crate::map_db_err;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, prelude::DateTimeWithTimeZone,
};

/// A comment under a post, with the commenter's login and avatar.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PostCommentRow {
    pub id: i32,
    pub comment_text: String,
    pub created_at: DateTimeWithTimeZone,
    pub post_id: i32,
    pub user_id: i32,
    pub user_login: String,
    pub user_avatar_url: Option<String>,
}

/// A comment written by a user, with the parent post's context.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct UserCommentRow {
    pub id: i32,
    pub comment_text: String,
    pub created_at: DateTimeWithTimeZone,
    pub post_id: i32,
    pub post_content: String,
    pub post_author_id: Option<i32>,
    pub post_author_login: Option<String>,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {id}")))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a comment.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Comment {id}")));
        }
        Ok(())
    }

    /// Comments under a post, newest first.
    pub async fn find_by_post_with_author(&self, post_id: i32) -> AppResult<Vec<PostCommentRow>> {
        Comment::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::CommentText,
                comment::Column::CreatedAt,
                comment::Column::PostId,
                comment::Column::UserId,
            ])
            .column_as(user::Column::Login, "user_login")
            .column_as(user::Column::AvatarUrl, "user_avatar_url")
            .join(JoinType::InnerJoin, comment::Relation::User.def())
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .into_model::<PostCommentRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Comments written by a user, newest first.
    pub async fn find_by_user_with_post(&self, user_id: i32) -> AppResult<Vec<UserCommentRow>> {
        Comment::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::CommentText,
                comment::Column::CreatedAt,
                comment::Column::PostId,
            ])
            .column_as(post::Column::Content, "post_content")
            .column_as(post::Column::AuthorId, "post_author_id")
            .column_as(user::Column::Login, "post_author_login")
            .join(JoinType::InnerJoin, comment::Relation::Post.def())
            .join(JoinType::LeftJoin, post::Relation::Author.def())
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .into_model::<UserCommentRow>()
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
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        match repo.get_by_id(9).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Comment 9"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_post_with_author() {
        let created_at: DateTimeWithTimeZone = Utc::now().into();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "id" => Value::from(1),
                    "comment_text" => Value::from("nice"),
                    "created_at" => Value::from(created_at),
                    "post_id" => Value::from(5),
                    "user_id" => Value::from(2),
                    "user_login" => Value::from("bob"),
                    "user_avatar_url" => Value::String(None),
                }]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let rows = repo.find_by_post_with_author(5).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_login, "bob");
        assert!(rows[0].user_avatar_url.is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_with_post() {
        let created_at: DateTimeWithTimeZone = Utc::now().into();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "id" => Value::from(1),
                    "comment_text" => Value::from("nice"),
                    "created_at" => Value::from(created_at),
                    "post_id" => Value::from(5),
                    "post_content" => Value::from("original post"),
                    "post_author_id" => Value::from(Some(1)),
                    "post_author_login" => Value::from(Some("alice".to_string())),
                }]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let rows = repo.find_by_user_with_post(2).await.unwrap();

        assert_eq!(rows[0].post_content, "original post");
        assert_eq!(rows[0].post_author_id, Some(1));
        assert_eq!(rows[0].post_author_login.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_delete_missing_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(matches!(repo.delete(1).await, Err(AppError::NotFound(_))));
    }
}
