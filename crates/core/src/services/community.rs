//! Community service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::community,
    repositories::{CommunityRepository, SubscriberRow, UserRepository},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::gate::require_admin;
use crate::services::post::PostView;

/// How many communities "most popular" returns when the client doesn't say.
pub const DEFAULT_POPULAR_COUNT: u32 = 5;

/// Community service for business logic.
#[derive(Clone)]
pub struct CommunityService {
    community_repo: CommunityRepository,
    user_repo: UserRepository,
}

/// Input for creating a community.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
}

/// A community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub publication_count: i32,
}

impl From<community::Model> for CommunityView {
    fn from(model: community::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            avatar_url: model.avatar_url,
            created_at: model.created_at.with_timezone(&Utc),
            publication_count: model.publication_count.unwrap_or(0),
        }
    }
}

/// A community and its posts, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityWithPosts {
    #[serde(flatten)]
    pub community: CommunityView,
    pub posts: Vec<PostView>,
}

/// A subscriber of a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberView {
    pub user_id: i32,
    pub login: String,
}

impl From<SubscriberRow> for SubscriberView {
    fn from(row: SubscriberRow) -> Self {
        Self {
            user_id: row.user_id,
            login: row.login,
        }
    }
}

/// A community and who is subscribed to it.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityWithSubscribers {
    #[serde(flatten)]
    pub community: CommunityView,
    pub subscribers: Vec<SubscriberView>,
}

impl CommunityService {
    /// Create a new community service.
    #[must_use]
    pub const fn new(community_repo: CommunityRepository, user_repo: UserRepository) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    /// List all communities.
    pub async fn list(&self) -> AppResult<Vec<CommunityView>> {
        let communities = self.community_repo.find_all().await?;
        Ok(communities.into_iter().map(CommunityView::from).collect())
    }

    /// Get a community by ID.
    pub async fn get(&self, id: i32) -> AppResult<CommunityView> {
        Ok(self.community_repo.get_by_id(id).await?.into())
    }

    /// Get a community by exact name.
    pub async fn get_by_name(&self, name: &str) -> AppResult<CommunityView> {
        self.community_repo
            .find_by_name(name)
            .await?
            .map(CommunityView::from)
            .ok_or_else(|| AppError::NotFound(format!("Community '{name}'")))
    }

    /// Communities with the most posts.
    pub async fn most_popular(&self, count: Option<u32>) -> AppResult<Vec<CommunityView>> {
        let limit = count.unwrap_or(DEFAULT_POPULAR_COUNT);
        let communities = self
            .community_repo
            .find_most_popular(u64::from(limit))
            .await?;
        Ok(communities.into_iter().map(CommunityView::from).collect())
    }

    /// A community with its posts.
    pub async fn with_posts(&self, id: i32) -> AppResult<CommunityWithPosts> {
        let (community, posts) = self
            .community_repo
            .find_with_posts(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {id}")))?;

        Ok(CommunityWithPosts {
            community: community.into(),
            posts: posts.into_iter().map(PostView::from).collect(),
        })
    }

    /// A community with its subscribers.
    pub async fn with_subscribers(&self, id: i32) -> AppResult<CommunityWithSubscribers> {
        let (community, subscribers) = self
            .community_repo
            .find_with_subscribers(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {id}")))?;

        Ok(CommunityWithSubscribers {
            community: community.into(),
            subscribers: subscribers.into_iter().map(SubscriberView::from).collect(),
        })
    }

    /// Create a community. Administrators only.
    pub async fn create(
        &self,
        caller: Option<i32>,
        input: CreateCommunityInput,
    ) -> AppResult<CommunityView> {
        let caller = require_admin(&self.user_repo, caller).await?;
        input.validate()?;

        let model = community::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            avatar_url: Set(input.avatar_url),
            created_at: Set(Utc::now().into()),
            publication_count: Set(Some(0)),
            ..Default::default()
        };

        let created = self.community_repo.create(model).await?;
        tracing::info!(community_id = created.id, admin_id = caller, "Created community");
        Ok(created.into())
    }

    /// Delete a community. Administrators only.
    pub async fn delete(&self, caller: Option<i32>, id: i32) -> AppResult<()> {
        let caller = require_admin(&self.user_repo, caller).await?;

        self.community_repo.delete(id).await?;
        tracing::info!(community_id = id, admin_id = caller, "Deleted community");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::{role, user};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    fn create_test_community(id: i32, count: Option<i32>) -> community::Model {
        community::Model {
            id,
            name: format!("community{id}"),
            description: None,
            avatar_url: None,
            created_at: Utc::now().into(),
            publication_count: count,
        }
    }

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

    fn service(community_db: MockDatabase, user_db: MockDatabase) -> CommunityService {
        CommunityService::new(
            CommunityRepository::new(Arc::new(community_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
        )
    }

    #[test]
    fn test_missing_count_reads_as_zero() {
        let view = CommunityView::from(create_test_community(1, None));
        assert_eq!(view.publication_count, 0);
    }

    #[tokio::test]
    async fn test_get_by_name_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<community::Model>::new()]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        assert!(matches!(
            service.get_by_name("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_long_description_is_valid() {
        let input = CreateCommunityInput {
            name: "rust".to_string(),
            description: Some("d".repeat(5000)),
            avatar_url: None,
        };
        assert!(input.validate().is_ok());

        let unnamed = CreateCommunityInput {
            name: String::new(),
            description: None,
            avatar_url: None,
        };
        assert!(unnamed.validate().is_err());
    }

    #[tokio::test]
    async fn test_most_popular_defaults_to_five() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community(1, Some(9))]])
                .into_connection(),
        );
        let service = CommunityService::new(
            CommunityRepository::new(community_db.clone()),
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        );

        let popular = service.most_popular(None).await.unwrap();
        assert_eq!(popular[0].publication_count, 9);

        drop(service);
        let log = format!(
            "{:?}",
            Arc::try_unwrap(community_db).unwrap().into_transaction_log()
        );
        assert!(log.contains("LIMIT $1"));
        assert!(log.contains("BigUnsigned(Some(5))"));
    }

    #[tokio::test]
    async fn test_with_subscribers_shape() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_community(1, Some(0))]])
                .append_query_results([vec![btreemap! {
                    "user_id" => Value::from(2),
                    "login" => Value::from("bob"),
                }]]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let view = service.with_subscribers(1).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["subscribers"][0]["userId"], 2);
        assert_eq!(json["subscribers"][0]["login"], "bob");
    }

    #[tokio::test]
    async fn test_create_by_non_admin_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(2, role::DEFAULT_ROLE_ID)]]),
        );

        let result = service
            .create(
                Some(2),
                CreateCommunityInput {
                    name: "rust".to_string(),
                    description: None,
                    avatar_url: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_by_admin() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_community(7, Some(0))]]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(1, role::ADMIN_ROLE_ID)]]),
        );

        let created = service
            .create(
                Some(1),
                CreateCommunityInput {
                    name: "community7".to_string(),
                    description: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, 7);
    }
}
