//! User endpoints: registration, login and self-management.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use agora_common::AppResult;
use agora_core::{ChangePasswordInput, LoginInput, RegisterInput, UpdateUserInput, UserView};

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Created<UserView>> {
    let user = state.user_service.register(input).await?;
    Ok(Created(user))
}

/// Check credentials.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<UserView>> {
    let user = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(user))
}

/// Show a user's profile.
async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<ApiResponse<UserView>> {
    let user = state.user_service.get(user_id).await?;
    Ok(ApiResponse::ok(user))
}

/// Update the caller's profile.
async fn update(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<impl IntoResponse> {
    state.user_service.update(caller, user_id, input).await?;
    Ok(response::ok())
}

/// Delete the caller's account.
async fn delete(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.user_service.delete(caller, user_id).await?;
    Ok(response::ok())
}

/// Change the caller's password.
async fn change_password(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<impl IntoResponse> {
    state
        .user_service
        .change_password(caller, user_id, input)
        .await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{user_id}", get(show).put(update).delete(delete))
        .route("/{user_id}/change-password", post(change_password))
}
