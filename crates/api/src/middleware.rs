//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use agora_core::{
    CommentService, CommunityService, LikeService, PostService, SubscriptionService,
    TopicService, UserService,
};

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Caller identity as parsed from [`USER_ID_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub i32);

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub subscription_service: SubscriptionService,
    pub community_service: CommunityService,
    pub topic_service: TopicService,
}

/// Parse the identity header into a request extension.
///
/// An absent or non-integer header leaves the request anonymous; handlers
/// that need an identity reject it later.
pub async fn identity_middleware(mut req: Request<Body>, next: Next) -> Response {
    let header = req.headers().get(USER_ID_HEADER);
    let identity = header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i32>().ok());
    let malformed = header.is_some() && identity.is_none();

    if let Some(id) = identity {
        req.extensions_mut().insert(Identity(id));
    } else if malformed {
        tracing::debug!(header = USER_ID_HEADER, "Ignoring malformed identity header");
    }

    next.run(req).await
}
