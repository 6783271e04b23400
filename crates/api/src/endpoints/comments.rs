//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use agora_common::AppResult;
use agora_core::{
    CommentView, CreateCommentInput, PostCommentView, UpdateCommentInput, UserCommentView,
};

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// Show one comment.
async fn show(
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state.comment_service.get(comment_id).await?;
    Ok(ApiResponse::ok(comment))
}

/// Edit the caller's comment.
async fn update(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .update(caller, comment_id, input)
        .await?;
    Ok(response::ok())
}

/// Delete the caller's comment.
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.comment_service.delete(caller, comment_id).await?;
    Ok(response::ok())
}

/// Comments under a post.
async fn list_by_post(
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<PostCommentView>>> {
    let comments = state.comment_service.list_by_post(post_id).await?;
    Ok(ApiResponse::ok(comments))
}

/// Comment on a post as the caller.
async fn create(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<Created<CommentView>> {
    let comment = state.comment_service.create(caller, post_id, input).await?;
    Ok(Created(comment))
}

/// Comments written by a user.
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<UserCommentView>>> {
    let comments = state.comment_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(comments))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/{comment_id}",
            get(show).put(update).delete(delete),
        )
        .route("/posts/{post_id}/comments", get(list_by_post).post(create))
        .route("/users/{user_id}/comments", get(list_by_user))
}
