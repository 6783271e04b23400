//! Topic endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use agora_common::AppResult;
use agora_core::{CreateTopicInput, TopicView, TopicWithPosts};
use serde::Deserialize;

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// Lookup by name request.
#[derive(Debug, Deserialize)]
pub struct ByNameQuery {
    pub name: String,
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<TopicView>>> {
    let topics = state.topic_service.list().await?;
    Ok(ApiResponse::ok(topics))
}

async fn show(
    State(state): State<AppState>,
    Path(topic_id): Path<i32>,
) -> AppResult<ApiResponse<TopicView>> {
    let topic = state.topic_service.get(topic_id).await?;
    Ok(ApiResponse::ok(topic))
}

async fn by_name(
    State(state): State<AppState>,
    Query(query): Query<ByNameQuery>,
) -> AppResult<ApiResponse<TopicView>> {
    let topic = state.topic_service.get_by_name(&query.name).await?;
    Ok(ApiResponse::ok(topic))
}

async fn with_posts(
    State(state): State<AppState>,
    Path(topic_id): Path<i32>,
) -> AppResult<ApiResponse<TopicWithPosts>> {
    let topic = state.topic_service.with_posts(topic_id).await?;
    Ok(ApiResponse::ok(topic))
}

/// Create a topic (admin only).
async fn create(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(input): Json<CreateTopicInput>,
) -> AppResult<Created<TopicView>> {
    let topic = state.topic_service.create(caller, input).await?;
    Ok(Created(topic))
}

/// Delete a topic (admin only).
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(topic_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.topic_service.delete(caller, topic_id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/by-name", get(by_name))
        .route("/{topic_id}", get(show).delete(delete))
        .route("/{topic_id}/with-posts", get(with_posts))
}
