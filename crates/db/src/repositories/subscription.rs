//! Subscription repository.

use std::sync::Arc;

use crate::entities::{Subscription, community, subscription, user};
use crate::map_db_err;
use agora_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, SelectModel, Selector,
};

/// A subscriber of a community.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SubscriberRow {
    pub user_id: i32,
    pub login: String,
}

/// A community a user is subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct UserSubscriptionRow {
    pub community_id: i32,
    pub community_name: String,
    pub community_description: Option<String>,
}

/// Subscribers of a community in subscription order.
pub(crate) fn subscribers_of(community_id: i32) -> Selector<SelectModel<SubscriberRow>> {
    Subscription::find()
        .select_only()
        .column(subscription::Column::UserId)
        .column_as(user::Column::Login, "login")
        .join(JoinType::InnerJoin, subscription::Relation::User.def())
        .filter(subscription::Column::CommunityId.eq(community_id))
        .order_by_asc(subscription::Column::Id)
        .into_model::<SubscriberRow>()
}

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subscription by user and community.
    pub async fn find_by_user_and_community(
        &self,
        user_id: i32,
        community_id: i32,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::CommunityId.eq(community_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check if a user is subscribed to a community.
    pub async fn is_subscribed(&self, user_id: i32, community_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_community(user_id, community_id)
            .await?
            .is_some())
    }

    /// Create a new subscription.
    pub async fn create(
        &self,
        model: subscription::ActiveModel,
    ) -> AppResult<subscription::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a subscription by ID.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = Subscription::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Communities a user is subscribed to.
    pub async fn find_by_user_with_community(
        &self,
        user_id: i32,
    ) -> AppResult<Vec<UserSubscriptionRow>> {
        Subscription::find()
            .select_only()
            .column(subscription::Column::CommunityId)
            .column_as(community::Column::Name, "community_name")
            .column_as(community::Column::Description, "community_description")
            .join(JoinType::InnerJoin, subscription::Relation::Community.def())
            .filter(subscription::Column::UserId.eq(user_id))
            .order_by_asc(subscription::Column::Id)
            .into_model::<UserSubscriptionRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    #[tokio::test]
    async fn test_is_subscribed() {
        let existing = subscription::Model {
            id: 1,
            user_id: 2,
            community_id: 3,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([Vec::<subscription::Model>::new()])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);
        assert!(repo.is_subscribed(2, 3).await.unwrap());
        assert!(!repo.is_subscribed(2, 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_user_with_community() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "community_id" => Value::from(3),
                    "community_name" => Value::from("rust"),
                    "community_description" => Value::String(None),
                }]])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);
        let rows = repo.find_by_user_with_community(2).await.unwrap();

        assert_eq!(
            rows,
            vec![UserSubscriptionRow {
                community_id: 3,
                community_name: "rust".to_string(),
                community_description: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);
        assert_eq!(repo.delete(1).await.unwrap(), 1);
    }
}
