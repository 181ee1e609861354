//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::actor_middleware};

pub mod documents;
pub mod fiscal;
pub mod health;
pub mod notifications;
pub mod vouchers;

/// Creates the API router.
///
/// Everything except health checks requires an acting user.
pub fn api_routes() -> Router<AppState> {
    let company_routes = Router::new()
        .merge(documents::routes())
        .merge(vouchers::routes())
        .merge(fiscal::routes())
        .merge(notifications::routes())
        .layer(middleware::from_fn(actor_middleware));

    Router::new().merge(health::routes()).merge(company_routes)
}
