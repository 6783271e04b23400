//! API endpoints.

mod comments;
mod communities;
mod likes;
mod posts;
mod subscriptions;
mod topics;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
///
/// Resource-rooted modules are nested; modules whose routes hang off another
/// resource (`/users/{id}/likes`, `/posts/{id}/comments`) carry full paths and
/// are merged.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/communities", communities::router())
        .nest("/topics", topics::router())
        .merge(posts::router())
        .merge(comments::router())
        .merge(likes::router())
        .merge(subscriptions::router())
}
