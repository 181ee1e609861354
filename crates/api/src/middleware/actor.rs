//! Actor identification for mutating routes.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user's id in `X-User-Id`. The id is recorded as submitter and poster.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Parses a positive user id from a header value.
fn parse_actor(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Middleware that resolves the acting user from `X-User-Id`.
///
/// Stores the actor in request extensions for handlers to access.
pub async fn actor_middleware(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok());

    let Some(raw) = header else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_actor",
                "message": "X-User-Id header is required"
            })),
        )
            .into_response();
    };

    match parse_actor(raw) {
        Some(user_id) => {
            request.extensions_mut().insert(ActorUser(user_id));
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_actor",
                "message": "X-User-Id must be a positive integer"
            })),
        )
            .into_response(),
    }
}

/// Extractor for the acting user.
///
/// ```ignore
/// async fn handler(actor: ActorUser) -> impl IntoResponse {
///     let user_id = actor.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorUser(pub i64);

impl ActorUser {
    /// Returns the acting user's id.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.0
    }
}

impl<S> FromRequestParts<S> for ActorUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().copied().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Acting user required"
                })),
            )
        })
    }
}
