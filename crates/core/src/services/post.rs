//! Post service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::post,
    repositories::{
        CommunityRepository, PostFilter, PostRepository, PostRow, TopicRepository, UserRepository,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::gate::{ensure_owner, require_identity};
use crate::services::media::{Attachment, MediaService};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    community_repo: CommunityRepository,
    topic_repo: TopicRepository,
    media: MediaService,
}

/// Input for creating a post.
#[derive(Debug, Default, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1))]
    pub content: String,

    pub community_id: Option<i32>,

    pub topic_id: Option<i32>,

    #[validate(length(max = 500))]
    pub share_url: Option<String>,

    pub attachment: Option<Attachment>,
}

/// Input for updating a post. Absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1))]
    pub content: Option<String>,

    #[validate(length(max = 500))]
    pub media_url: Option<String>,

    pub community_id: Option<i32>,

    pub topic_id: Option<i32>,

    #[validate(length(max = 500))]
    pub share_url: Option<String>,
}

/// Listing filters, all optional and combinable.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub community_id: Option<i32>,
    pub topic_id: Option<i32>,
    pub author_id: Option<i32>,
}

impl From<ListPostsQuery> for PostFilter {
    fn from(query: ListPostsQuery) -> Self {
        Self {
            community_id: query.community_id,
            topic_id: query.topic_id,
            author_id: query.author_id,
        }
    }
}

/// `{id, name}` reference to a community or topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
}

impl Summary {
    fn from_parts(id: Option<i32>, name: Option<String>) -> Option<Self> {
        Some(Self { id: id?, name: name? })
    }
}

/// A post as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i32,
    pub content: String,
    pub media_url: Option<String>,
    pub share_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<i32>,
    pub community: Option<Summary>,
    pub topic: Option<Summary>,
    pub comments_count: i64,
    pub likes_count: i64,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            media_url: row.media_url,
            share_url: row.share_url,
            created_at: row.created_at.with_timezone(&Utc),
            author_id: row.author_id,
            community: Summary::from_parts(row.community_id, row.community_name),
            topic: Summary::from_parts(row.topic_id, row.topic_name),
            comments_count: row.comments_count,
            likes_count: row.likes_count,
        }
    }
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        community_repo: CommunityRepository,
        topic_repo: TopicRepository,
        media: MediaService,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            community_repo,
            topic_repo,
            media,
        }
    }

    /// Get one post.
    pub async fn get(&self, id: i32) -> AppResult<PostView> {
        self.post_repo
            .find_row_by_id(id)
            .await?
            .map(PostView::from)
            .ok_or_else(|| AppError::NotFound(format!("Post {id}")))
    }

    /// List posts, newest first.
    pub async fn list(&self, query: ListPostsQuery) -> AppResult<Vec<PostView>> {
        let rows = self.post_repo.find_rows(query.into()).await?;
        Ok(rows.into_iter().map(PostView::from).collect())
    }

    /// List a user's posts, newest first.
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<PostView>> {
        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id}")));
        }

        self.list(ListPostsQuery {
            author_id: Some(user_id),
            ..Default::default()
        })
        .await
    }

    /// Create a post authored by `user_id`, storing its attachment if any.
    pub async fn create(
        &self,
        caller: Option<i32>,
        user_id: i32,
        input: CreatePostInput,
    ) -> AppResult<PostView> {
        let caller = require_identity(caller)?;
        input.validate()?;
        let format = input.attachment.as_ref().map(Attachment::validate).transpose()?;

        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id}")));
        }
        ensure_owner(caller, Some(user_id), "account")?;
        self.check_references(input.community_id, input.topic_id).await?;

        let stored = match (&input.attachment, format) {
            (Some(attachment), Some(format)) => Some(self.media.store(attachment, format).await?),
            _ => None,
        };

        let model = post::ActiveModel {
            content: Set(input.content),
            media_url: Set(stored.as_ref().map(|f| f.url.clone())),
            share_url: Set(input.share_url),
            created_at: Set(Utc::now().into()),
            author_id: Set(Some(user_id)),
            community_id: Set(input.community_id),
            topic_id: Set(input.topic_id),
            ..Default::default()
        };

        let created = match self.post_repo.create(model).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(file) = &stored {
                    self.media.discard(file).await;
                }
                return Err(e);
            }
        };

        tracing::info!(post_id = created.id, user_id, "Created post");
        self.get(created.id).await
    }

    /// Update the caller's post.
    pub async fn update(
        &self,
        caller: Option<i32>,
        id: i32,
        input: UpdatePostInput,
    ) -> AppResult<PostView> {
        let caller = require_identity(caller)?;
        input.validate()?;

        let existing = self.post_repo.get_by_id(id).await?;
        ensure_owner(caller, existing.author_id, "post")?;
        self.check_references(input.community_id, input.topic_id).await?;

        let previous_community_id = existing.community_id;
        let mut active: post::ActiveModel = existing.into();
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(media_url) = input.media_url {
            active.media_url = Set(Some(media_url));
        }
        if let Some(community_id) = input.community_id {
            active.community_id = Set(Some(community_id));
        }
        if let Some(topic_id) = input.topic_id {
            active.topic_id = Set(Some(topic_id));
        }
        if let Some(share_url) = input.share_url {
            active.share_url = Set(Some(share_url));
        }

        self.post_repo.update(active, previous_community_id).await?;
        self.get(id).await
    }

    /// Delete the caller's post with its comments and likes.
    pub async fn delete(&self, caller: Option<i32>, id: i32) -> AppResult<()> {
        let caller = require_identity(caller)?;

        let existing = self.post_repo.get_by_id(id).await?;
        ensure_owner(caller, existing.author_id, "post")?;

        self.post_repo.delete(&existing).await?;
        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }

    async fn check_references(
        &self,
        community_id: Option<i32>,
        topic_id: Option<i32>,
    ) -> AppResult<()> {
        if let Some(id) = community_id {
            if !self.community_repo.exists(id).await? {
                return Err(AppError::NotFound(format!("Community {id}")));
            }
        }
        if let Some(id) = topic_id {
            if !self.topic_repo.exists(id).await? {
                return Err(AppError::NotFound(format!("Topic {id}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::media::StorageService;
    use agora_common::LocalStorage;
    use agora_db::entities::community;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn service(db: &Arc<DatabaseConnection>) -> PostService {
        let storage: StorageService = Arc::new(LocalStorage::new(
            std::env::temp_dir().join("agora-post-tests"),
            "/uploads".to_string(),
        ));
        PostService::new(
            PostRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            CommunityRepository::new(db.clone()),
            TopicRepository::new(db.clone()),
            MediaService::new(storage),
        )
    }

    fn create_test_post(id: i32, author_id: Option<i32>) -> post::Model {
        post::Model {
            id,
            content: "Hello".to_string(),
            media_url: None,
            share_url: None,
            created_at: Utc::now().into(),
            author_id,
            community_id: None,
            topic_id: None,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Value::from(n) }
    }

    #[test]
    fn test_view_nests_summaries() {
        let row = PostRow {
            id: 1,
            content: "hi".to_string(),
            media_url: None,
            share_url: None,
            created_at: Utc::now().into(),
            author_id: Some(1),
            community_id: Some(3),
            community_name: Some("rust".to_string()),
            topic_id: None,
            topic_name: None,
            comments_count: 2,
            likes_count: 1,
        };

        let json = serde_json::to_value(PostView::from(row)).unwrap();
        assert_eq!(json["community"]["id"], 3);
        assert_eq!(json["community"]["name"], "rust");
        assert!(json["topic"].is_null());
        assert_eq!(json["commentsCount"], 2);
        assert_eq!(json["likesCount"], 1);
    }

    #[tokio::test]
    async fn test_create_with_bmp_attachment_writes_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(&db);

        let result = service
            .create(
                Some(1),
                1,
                CreatePostInput {
                    content: "look".to_string(),
                    attachment: Some(Attachment {
                        file_name: "scan.bmp".to_string(),
                        data: vec![1, 2, 3],
                    }),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_create_for_other_user_forbidden() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(1)]])
                .into_connection(),
        );
        let service = service(&db);

        let result = service
            .create(
                Some(2),
                1,
                CreatePostInput {
                    content: "hijack".to_string(),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_missing_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(0)]])
                .into_connection(),
        );
        let service = service(&db);

        let result = service
            .create(
                Some(9),
                9,
                CreatePostInput {
                    content: "hello".to_string(),
                    ..Default::default()
                },
            )
            .await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User 9"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_create_unknown_community() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(1)]])
                .append_query_results([Vec::<community::Model>::new()])
                .into_connection(),
        );
        let service = service(&db);

        let result = service
            .create(
                Some(1),
                1,
                CreatePostInput {
                    content: "hello".to_string(),
                    community_id: Some(42),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_author_forbidden() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(5, Some(1))]])
                .into_connection(),
        );
        let service = service(&db);

        match service.delete(Some(2), 5).await {
            Err(AppError::Forbidden(msg)) => assert!(msg.contains("post")),
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_update_orphaned_post_forbidden() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(5, None)]])
                .into_connection(),
        );
        let service = service(&db);

        let result = service
            .update(
                Some(1),
                5,
                UpdatePostInput {
                    content: Some("mine now".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(5, Some(1))]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = service(&db);

        assert!(service.delete(Some(1), 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_post_before_ownership() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let service = service(&db);

        assert!(matches!(
            service.delete(Some(2), 5).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let service = service(&db);

        match service.get(404).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Post 404"),
            _ => panic!("Expected NotFound error"),
        }
    }
}
