//! Community repository.

use std::sync::Arc;

use crate::entities::{Community, community, post};
use crate::map_db_err;
use crate::repositories::post::{PostRow, newest_first, post_rows};
use crate::repositories::snapshot;
use crate::repositories::subscription::{SubscriberRow, subscribers_of};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Order,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

/// Bump a community's publication count by one.
pub(crate) async fn increment_publication_count<C: ConnectionTrait>(
    conn: &C,
    community_id: i32,
) -> Result<(), DbErr> {
    Community::update_many()
        .col_expr(
            community::Column::PublicationCount,
            Expr::cust(r#"COALESCE("publication_count", 0) + 1"#),
        )
        .filter(community::Column::Id.eq(community_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Drop a community's publication count by one, never below zero.
pub(crate) async fn decrement_publication_count<C: ConnectionTrait>(
    conn: &C,
    community_id: i32,
) -> Result<(), DbErr> {
    Community::update_many()
        .col_expr(
            community::Column::PublicationCount,
            Expr::cust(r#"GREATEST(COALESCE("publication_count", 0) - 1, 0)"#),
        )
        .filter(community::Column::Id.eq(community_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Community repository for database operations.
#[derive(Clone)]
pub struct CommunityRepository {
    db: Arc<DatabaseConnection>,
}

impl CommunityRepository {
    /// Create a new community repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a community by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<community::Model>> {
        Community::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a community by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<community::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {id}")))
    }

    /// Check whether a community exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find a community by exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<community::Model>> {
        Community::find()
            .filter(community::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List all communities.
    pub async fn find_all(&self) -> AppResult<Vec<community::Model>> {
        Community::find()
            .order_by_asc(community::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Communities with the most posts first (missing count reads as zero).
    pub async fn find_most_popular(&self, limit: u64) -> AppResult<Vec<community::Model>> {
        Community::find()
            .order_by(
                Expr::cust(r#"COALESCE("communities"."publication_count", 0)"#),
                Order::Desc,
            )
            .order_by_asc(community::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Load a community and its posts from one snapshot.
    pub async fn find_with_posts(
        &self,
        id: i32,
    ) -> AppResult<Option<(community::Model, Vec<PostRow>)>> {
        let txn = snapshot(self.db.as_ref()).await.map_err(map_db_err)?;

        let Some(found) = Community::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let posts = newest_first(post_rows().filter(post::Column::CommunityId.eq(id)))
            .into_model::<PostRow>()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(Some((found, posts)))
    }

    /// Load a community and its subscribers from one snapshot.
    pub async fn find_with_subscribers(
        &self,
        id: i32,
    ) -> AppResult<Option<(community::Model, Vec<SubscriberRow>)>> {
        let txn = snapshot(self.db.as_ref()).await.map_err(map_db_err)?;

        let Some(found) = Community::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let subscribers = subscribers_of(id)
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(Some((found, subscribers)))
    }

    /// Create a new community.
    pub async fn create(&self, model: community::ActiveModel) -> AppResult<community::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a community. Its posts lose the reference, subscriptions go.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Community::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Community {id}")));
        }
        Ok(())
    }
}
