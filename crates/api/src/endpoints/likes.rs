//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use agora_common::AppResult;
use agora_core::{LikeView, LikedPostView};

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// The caller's like on a post.
async fn show(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<LikeView>> {
    let like = state.like_service.get(caller, post_id).await?;
    Ok(ApiResponse::ok(like))
}

/// Like a post.
async fn create(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<Created<LikeView>> {
    let like = state.like_service.like(caller, post_id).await?;
    Ok(Created(like))
}

/// Remove the caller's like.
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.like_service.unlike(caller, post_id).await?;
    Ok(response::ok())
}

/// Posts a user liked.
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<LikedPostView>>> {
    let likes = state.like_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(likes))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/{post_id}/likes",
            get(show).post(create).delete(delete),
        )
        .route("/users/{user_id}/likes", get(list_by_user))
}
