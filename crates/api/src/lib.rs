//! HTTP API layer for agora.
//!
//! - **Endpoints**: users, posts, comments, likes, subscriptions, communities, topics
//! - **Extractors**: caller identity from the `X-User-Id` header
//! - **Middleware**: application state and identity propagation
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, identity_middleware};
