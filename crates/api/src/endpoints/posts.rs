//! Post endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use agora_common::{AppError, AppResult};
use agora_core::{Attachment, CreatePostInput, ListPostsQuery, PostView, UpdatePostInput};

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// List posts, optionally filtered by community, topic or author.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<ApiResponse<Vec<PostView>>> {
    let posts = state.post_service.list(query).await?;
    Ok(ApiResponse::ok(posts))
}

/// Show one post.
async fn show(
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<PostView>> {
    let post = state.post_service.get(post_id).await?;
    Ok(ApiResponse::ok(post))
}

/// Update the caller's post.
async fn update(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<impl IntoResponse> {
    state.post_service.update(caller, post_id, input).await?;
    Ok(response::ok())
}

/// Delete the caller's post.
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(caller, post_id).await?;
    Ok(response::ok())
}

/// List a user's posts.
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<PostView>>> {
    let posts = state.post_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(posts))
}

/// Create a post from a multipart form.
async fn create(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Created<PostView>> {
    let input = read_post_form(multipart).await?;
    let post = state.post_service.create(caller, user_id, input).await?;
    Ok(Created(post))
}

/// Collect post fields. Names match case-insensitively so both `imageFile`
/// and `ImageFile` work.
async fn read_post_form(mut multipart: Multipart) -> AppResult<CreatePostInput> {
    let mut input = CreatePostInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_ascii_lowercase();

        if name == "imagefile" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !data.is_empty() {
                input.attachment = Some(Attachment {
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "content" => input.content = text,
            "communityid" => input.community_id = parse_id(&name, &text)?,
            "topicid" => input.topic_id = parse_id(&name, &text)?,
            "shareurl" if !text.is_empty() => input.share_url = Some(text),
            _ => {}
        }
    }

    Ok(input)
}

fn parse_id(field: &str, text: &str) -> AppResult<Option<i32>> {
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{field} must be an integer")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list))
        .route("/posts/{post_id}", get(show).put(update).delete(delete))
        .route("/users/{user_id}/posts", get(list_by_user).post(create))
}
