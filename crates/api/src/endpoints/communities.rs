//! Community endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use agora_common::AppResult;
use agora_core::{
    CommunityView, CommunityWithPosts, CommunityWithSubscribers, CreateCommunityInput,
};
use serde::Deserialize;

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// Most popular request.
#[derive(Debug, Deserialize)]
pub struct MostPopularQuery {
    pub count: Option<u32>,
}

/// Lookup by name request.
#[derive(Debug, Deserialize)]
pub struct ByNameQuery {
    pub name: String,
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CommunityView>>> {
    let communities = state.community_service.list().await?;
    Ok(ApiResponse::ok(communities))
}

async fn show(
    State(state): State<AppState>,
    Path(community_id): Path<i32>,
) -> AppResult<ApiResponse<CommunityView>> {
    let community = state.community_service.get(community_id).await?;
    Ok(ApiResponse::ok(community))
}

async fn by_name(
    State(state): State<AppState>,
    Query(query): Query<ByNameQuery>,
) -> AppResult<ApiResponse<CommunityView>> {
    let community = state.community_service.get_by_name(&query.name).await?;
    Ok(ApiResponse::ok(community))
}

async fn most_popular(
    State(state): State<AppState>,
    Query(query): Query<MostPopularQuery>,
) -> AppResult<ApiResponse<Vec<CommunityView>>> {
    let communities = state.community_service.most_popular(query.count).await?;
    Ok(ApiResponse::ok(communities))
}

async fn with_posts(
    State(state): State<AppState>,
    Path(community_id): Path<i32>,
) -> AppResult<ApiResponse<CommunityWithPosts>> {
    let community = state.community_service.with_posts(community_id).await?;
    Ok(ApiResponse::ok(community))
}

async fn with_subscriptions(
    State(state): State<AppState>,
    Path(community_id): Path<i32>,
) -> AppResult<ApiResponse<CommunityWithSubscribers>> {
    let community = state
        .community_service
        .with_subscribers(community_id)
        .await?;
    Ok(ApiResponse::ok(community))
}

/// Create a community (admin only).
async fn create(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(input): Json<CreateCommunityInput>,
) -> AppResult<Created<CommunityView>> {
    let community = state.community_service.create(caller, input).await?;
    Ok(Created(community))
}

/// Delete a community (admin only).
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(community_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.community_service.delete(caller, community_id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/most-popular", get(most_popular))
        .route("/by-name", get(by_name))
        .route("/{community_id}", get(show).delete(delete))
        .route("/{community_id}/with-posts", get(with_posts))
        .route("/{community_id}/with-subscriptions", get(with_subscriptions))
}
