//! Topic repository.

use std::sync::Arc;

use crate::entities::{Topic, post, topic};
use crate::map_db_err;
use crate::repositories::post::{PostRow, newest_first, post_rows};
use crate::repositories::snapshot;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Topic repository for database operations.
#[derive(Clone)]
pub struct TopicRepository {
    db: Arc<DatabaseConnection>,
}

impl TopicRepository {
    /// Create a new topic repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a topic by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<topic::Model>> {
        Topic::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a topic by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<topic::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic {id}")))
    }

    /// Check whether a topic exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// List all topics.
    pub async fn find_all(&self) -> AppResult<Vec<topic::Model>> {
        Topic::find()
            .order_by_asc(topic::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a topic by name. Names are not unique; the oldest wins.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<topic::Model>> {
        Topic::find()
            .filter(topic::Column::Name.eq(name))
            .order_by_asc(topic::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Load a topic and its posts from one snapshot.
    pub async fn find_with_posts(
        &self,
        id: i32,
    ) -> AppResult<Option<(topic::Model, Vec<PostRow>)>> {
        let txn = snapshot(self.db.as_ref()).await.map_err(map_db_err)?;

        let Some(found) = Topic::find_by_id(id).one(&txn).await.map_err(map_db_err)? else {
            return Ok(None);
        };

        let posts = newest_first(post_rows().filter(post::Column::TopicId.eq(id)))
            .into_model::<PostRow>()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(Some((found, posts)))
    }

    /// Create a new topic.
    pub async fn create(&self, model: topic::ActiveModel) -> AppResult<topic::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a topic. Its posts lose the reference.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Topic::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Topic {id}")));
        }
        Ok(())
    }
}
