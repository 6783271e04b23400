//! Topic service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::topic,
    repositories::{TopicRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::gate::require_admin;
use crate::services::post::PostView;

/// Topic service for business logic.
#[derive(Clone)]
pub struct TopicService {
    topic_repo: TopicRepository,
    user_repo: UserRepository,
}

/// Input for creating a topic.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub icon_url: Option<String>,
}

/// A topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    pub id: i32,
    pub name: String,
    pub icon_url: Option<String>,
}

impl From<topic::Model> for TopicView {
    fn from(model: topic::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon_url: model.icon_url,
        }
    }
}

/// A topic and its posts, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct TopicWithPosts {
    #[serde(flatten)]
    pub topic: TopicView,
    pub posts: Vec<PostView>,
}

impl TopicService {
    /// Create a new topic service.
    #[must_use]
    pub const fn new(topic_repo: TopicRepository, user_repo: UserRepository) -> Self {
        Self {
            topic_repo,
            user_repo,
        }
    }

    /// List all topics.
    pub async fn list(&self) -> AppResult<Vec<TopicView>> {
        let topics = self.topic_repo.find_all().await?;
        Ok(topics.into_iter().map(TopicView::from).collect())
    }

    /// Get a topic by ID.
    pub async fn get(&self, id: i32) -> AppResult<TopicView> {
        Ok(self.topic_repo.get_by_id(id).await?.into())
    }

    /// Get a topic by exact name.
    pub async fn get_by_name(&self, name: &str) -> AppResult<TopicView> {
        self.topic_repo
            .find_by_name(name)
            .await?
            .map(TopicView::from)
            .ok_or_else(|| AppError::NotFound(format!("Topic '{name}'")))
    }

    /// A topic with its posts.
    pub async fn with_posts(&self, id: i32) -> AppResult<TopicWithPosts> {
        let (topic, posts) = self
            .topic_repo
            .find_with_posts(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic {id}")))?;

        Ok(TopicWithPosts {
            topic: topic.into(),
            posts: posts.into_iter().map(PostView::from).collect(),
        })
    }

    /// Create a topic. Administrators only.
    pub async fn create(&self, caller: Option<i32>, input: CreateTopicInput) -> AppResult<TopicView> {
        let caller = require_admin(&self.user_repo, caller).await?;
        input.validate()?;

        let model = topic::ActiveModel {
            name: Set(input.name),
            icon_url: Set(input.icon_url),
            ..Default::default()
        };

        let created = self.topic_repo.create(model).await?;
        tracing::info!(topic_id = created.id, admin_id = caller, "Created topic");
        Ok(created.into())
    }

    /// Delete a topic. Administrators only.
    pub async fn delete(&self, caller: Option<i32>, id: i32) -> AppResult<()> {
        let caller = require_admin(&self.user_repo, caller).await?;

        self.topic_repo.delete(id).await?;
        tracing::info!(topic_id = id, admin_id = caller, "Deleted topic");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(topic_db: MockDatabase) -> TopicService {
        TopicService::new(
            TopicRepository::new(Arc::new(topic_db.into_connection())),
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        )
    }

    #[tokio::test]
    async fn test_with_posts_missing_topic() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<topic::Model>::new()]),
        );

        match service.with_posts(3).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Topic 3"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
            topic::Model {
                id: 2,
                name: "news".to_string(),
                icon_url: Some("/icons/news.svg".to_string()),
            },
        ]]));

        let topic = service.get_by_name("news").await.unwrap();
        assert_eq!(topic.id, 2);
        assert_eq!(topic.icon_url.as_deref(), Some("/icons/news.svg"));
    }

    #[tokio::test]
    async fn test_delete_requires_identity() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        assert!(matches!(
            service.delete(None, 1).await,
            Err(AppError::Unauthenticated)
        ));
    }
}
