//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, community, post, topic};
use crate::map_db_err;
use crate::repositories::community::{decrement_publication_count, increment_publication_count};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Select, TransactionTrait,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};

const COMMENTS_COUNT: &str =
    r#"(SELECT COUNT(*) FROM "comments" WHERE "comments"."post_id" = "posts"."id")"#;
const LIKES_COUNT: &str =
    r#"(SELECT COUNT(*) FROM "likes" WHERE "likes"."post_id" = "posts"."id")"#;

/// A post with its community/topic names and live comment/like counts.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PostRow {
    pub id: i32,
    pub content: String,
    pub media_url: Option<String>,
    pub share_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub author_id: Option<i32>,
    pub community_id: Option<i32>,
    pub community_name: Option<String>,
    pub topic_id: Option<i32>,
    pub topic_name: Option<String>,
    pub comments_count: i64,
    pub likes_count: i64,
}

/// Optional, independently combinable listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub community_id: Option<i32>,
    pub topic_id: Option<i32>,
    pub author_id: Option<i32>,
}

/// Base select for [`PostRow`]: one statement, counts as correlated subqueries.
pub(crate) fn post_rows() -> Select<Post> {
    Post::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::Content,
            post::Column::MediaUrl,
            post::Column::ShareUrl,
            post::Column::CreatedAt,
            post::Column::AuthorId,
            post::Column::CommunityId,
            post::Column::TopicId,
        ])
        .column_as(community::Column::Name, "community_name")
        .column_as(topic::Column::Name, "topic_name")
        .expr_as(Expr::cust(COMMENTS_COUNT), "comments_count")
        .expr_as(Expr::cust(LIKES_COUNT), "likes_count")
        .join(JoinType::LeftJoin, post::Relation::Community.def())
        .join(JoinType::LeftJoin, post::Relation::Topic.def())
}

/// Newest first; id breaks ties between posts created in the same instant.
pub(crate) fn newest_first(select: Select<Post>) -> Select<Post> {
    select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {id}")))
    }

    /// Check whether a post exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find the projection of one post.
    pub async fn find_row_by_id(&self, id: i32) -> AppResult<Option<PostRow>> {
        post_rows()
            .filter(post::Column::Id.eq(id))
            .into_model::<PostRow>()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List post projections matching the filter, newest first.
    pub async fn find_rows(&self, filter: PostFilter) -> AppResult<Vec<PostRow>> {
        let query = post_rows()
            .apply_if(filter.community_id, |q, id| {
                q.filter(post::Column::CommunityId.eq(id))
            })
            .apply_if(filter.topic_id, |q, id| q.filter(post::Column::TopicId.eq(id)))
            .apply_if(filter.author_id, |q, id| {
                q.filter(post::Column::AuthorId.eq(id))
            });

        newest_first(query)
            .into_model::<PostRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a post and count it against its community in one transaction.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let created = model.insert(&txn).await.map_err(map_db_err)?;
        if let Some(community_id) = created.community_id {
            increment_publication_count(&txn, community_id)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(created)
    }

    /// Update a post, moving its publication count if the community changed.
    pub async fn update(
        &self,
        model: post::ActiveModel,
        previous_community_id: Option<i32>,
    ) -> AppResult<post::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let updated = model.update(&txn).await.map_err(map_db_err)?;
        if updated.community_id != previous_community_id {
            if let Some(old) = previous_community_id {
                decrement_publication_count(&txn, old)
                    .await
                    .map_err(map_db_err)?;
            }
            if let Some(new) = updated.community_id {
                increment_publication_count(&txn, new)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(updated)
    }

    /// Delete a post (comments and likes cascade) and release its community count.
    pub async fn delete(&self, post: &post::Model) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = Post::delete_by_id(post.id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Post {}", post.id)));
        }

        if let Some(community_id) = post.community_id {
            decrement_publication_count(&txn, community_id)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    fn create_test_post(id: i32, author_id: i32, community_id: Option<i32>) -> post::Model {
        post::Model {
            id,
            content: "Hello".to_string(),
            media_url: None,
            share_url: None,
            created_at: Utc::now().into(),
            author_id: Some(author_id),
            community_id,
            topic_id: None,
        }
    }

    fn row(
        id: i32,
        community: Option<(i32, &str)>,
        comments: i64,
        likes: i64,
    ) -> std::collections::BTreeMap<&'static str, Value> {
        let created_at: DateTimeWithTimeZone = Utc::now().into();
        btreemap! {
            "id" => id.into(),
            "content" => format!("post {id}").into(),
            "media_url" => Value::String(None),
            "share_url" => Value::String(None),
            "created_at" => created_at.into(),
            "author_id" => Some(1).into(),
            "community_id" => community.map(|(cid, _)| cid).into(),
            "community_name" => community.map(|(_, name)| name.to_string()).into(),
            "topic_id" => Value::Int(None),
            "topic_name" => Value::String(None),
            "comments_count" => comments.into(),
            "likes_count" => likes.into(),
        }
    }

    #[tokio::test]
    async fn test_find_row_by_id_carries_counts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(3, Some((9, "rust")), 2, 5)]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let found = repo.find_row_by_id(3).await.unwrap().unwrap();

        assert_eq!(found.id, 3);
        assert_eq!(found.community_id, Some(9));
        assert_eq!(found.community_name.as_deref(), Some("rust"));
        assert_eq!(found.comments_count, 2);
        assert_eq!(found.likes_count, 5);
        assert!(found.topic_id.is_none());
    }

    #[tokio::test]
    async fn test_find_rows_with_filters() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(2, None, 0, 0), row(1, None, 1, 0)]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let rows = repo
            .find_rows(PostFilter {
                author_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_post_rows_query_shape() {
        let sql = newest_first(post_rows())
            .filter(post::Column::TopicId.eq(4))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "communities""#));
        assert!(sql.contains(r#"LEFT JOIN "topics""#));
        assert!(sql.contains(r#"AS "comments_count""#));
        assert!(sql.contains(r#"AS "likes_count""#));
        assert!(sql.contains(r#"ORDER BY "posts"."created_at" DESC"#));
    }

    #[tokio::test]
    async fn test_create_in_community_bumps_counter() {
        let post = create_test_post(1, 1, Some(9));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        let model = post::ActiveModel {
            content: Set(post.content.clone()),
            author_id: Set(post.author_id),
            community_id: Set(post.community_id),
            ..Default::default()
        };
        let created = repo.create(model).await.unwrap();
        assert_eq!(created.id, 1);

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let log = format!("{log:?}");
        assert!(log.contains("publication_count"));
    }

    #[tokio::test]
    async fn test_create_without_community_leaves_counters() {
        let post = create_test_post(1, 1, None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        let model = post::ActiveModel {
            content: Set(post.content.clone()),
            author_id: Set(post.author_id),
            ..Default::default()
        };
        repo.create(model).await.unwrap();

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(!format!("{log:?}").contains("publication_count"));
    }

    #[tokio::test]
    async fn test_delete_vanished_post() {
        let post = create_test_post(5, 1, Some(9));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.delete(&post).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
