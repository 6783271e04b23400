//! Subscription service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::subscription,
    repositories::{CommunityRepository, SubscriptionRepository, UserRepository, UserSubscriptionRow},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::gate::{ensure_owner, require_identity};

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    community_repo: CommunityRepository,
    user_repo: UserRepository,
}

/// Input for subscribing to a community.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeInput {
    pub community_id: i32,
}

/// A subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub id: i32,
    pub user_id: i32,
    pub community_id: i32,
}

impl From<subscription::Model> for SubscriptionView {
    fn from(model: subscription::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            community_id: model.community_id,
        }
    }
}

/// A community the user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscriptionView {
    pub community_id: i32,
    pub community_name: String,
    pub community_description: Option<String>,
}

impl From<UserSubscriptionRow> for UserSubscriptionView {
    fn from(row: UserSubscriptionRow) -> Self {
        Self {
            community_id: row.community_id,
            community_name: row.community_name,
            community_description: row.community_description,
        }
    }
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        community_repo: CommunityRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            subscription_repo,
            community_repo,
            user_repo,
        }
    }

    /// Subscribe `user_id` to a community. Only that user may do so.
    pub async fn subscribe(
        &self,
        caller: Option<i32>,
        user_id: i32,
        input: SubscribeInput,
    ) -> AppResult<SubscriptionView> {
        let caller = require_identity(caller)?;
        ensure_owner(caller, Some(user_id), "subscription list")?;

        let community_id = input.community_id;
        if !self.community_repo.exists(community_id).await? {
            return Err(AppError::NotFound(format!("Community {community_id}")));
        }

        if self
            .subscription_repo
            .is_subscribed(user_id, community_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Already subscribed to this community".to_string(),
            ));
        }

        let model = subscription::ActiveModel {
            user_id: Set(user_id),
            community_id: Set(community_id),
            ..Default::default()
        };

        let created = self.subscription_repo.create(model).await?;
        tracing::debug!(user_id, community_id, "Subscribed");
        Ok(created.into())
    }

    /// Drop `user_id`'s subscription to a community. Only that user may do so.
    pub async fn unsubscribe(
        &self,
        caller: Option<i32>,
        user_id: i32,
        community_id: i32,
    ) -> AppResult<()> {
        let caller = require_identity(caller)?;
        ensure_owner(caller, Some(user_id), "subscription list")?;

        let not_found = || AppError::NotFound("Subscription not found".to_string());

        let existing = self
            .subscription_repo
            .find_by_user_and_community(user_id, community_id)
            .await?
            .ok_or_else(not_found)?;

        if self.subscription_repo.delete(existing.id).await? == 0 {
            return Err(not_found());
        }

        tracing::debug!(user_id, community_id, "Unsubscribed");
        Ok(())
    }

    /// Communities a user is subscribed to.
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<UserSubscriptionView>> {
        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id}")));
        }

        let rows = self
            .subscription_repo
            .find_by_user_with_community(user_id)
            .await?;
        Ok(rows.into_iter().map(UserSubscriptionView::from).collect())
    }
}
