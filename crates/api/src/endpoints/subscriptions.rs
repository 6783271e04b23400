//! Subscription endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
};
use agora_common::AppResult;
use agora_core::{SubscribeInput, SubscriptionView, UserSubscriptionView};

use crate::{
    extractors::Caller,
    middleware::AppState,
    response::{self, ApiResponse, Created},
};

/// Communities a user is subscribed to.
async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<UserSubscriptionView>>> {
    let subscriptions = state.subscription_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(subscriptions))
}

/// Subscribe the caller to a community.
async fn subscribe(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(input): Json<SubscribeInput>,
) -> AppResult<Created<SubscriptionView>> {
    let subscription = state
        .subscription_service
        .subscribe(caller, user_id, input)
        .await?;
    Ok(Created(subscription))
}

/// Unsubscribe the caller from a community.
async fn unsubscribe(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path((user_id, community_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    state
        .subscription_service
        .unsubscribe(caller, user_id, community_id)
        .await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/subscriptions", get(list).post(subscribe))
        .route(
            "/users/{user_id}/subscriptions/{community_id}",
            delete(unsubscribe),
        )
}
