//! Request extractors.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::Identity;

/// The caller's asserted identity, if any.
///
/// Never rejects: services decide whether an operation needs an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Option<i32>);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by identity middleware
        Ok(Self(parts.extensions.get::<Identity>().map(|id| id.0)))
    }
}
