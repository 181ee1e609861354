//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for document submission, voucher posting, and fiscal years
//! - Actor middleware identifying the calling user
//! - JSON error responses mapped from domain errors

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use ledgerflow_shared::config::PostingConfig;
use ledgerflow_shared::email::EmailService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Posting configuration (currency scale, fiscal defaults, timezone).
    pub posting: PostingConfig,
    /// Email service for assignee notifications.
    pub email_service: Arc<EmailService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AppState;
    use axum::{body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use ledgerflow_shared::config::{EmailConfig, PostingConfig};
    use ledgerflow_shared::email::EmailService;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    pub fn state(db: DatabaseConnection) -> AppState {
        AppState {
            db: Arc::new(db),
            posting: PostingConfig::default(),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
        }
    }

    pub fn post_json(uri: &str, user_id: Option<i64>, body: &serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(id) = user_id {
            builder = builder.header("X-User-Id", id.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_needs_no_actor() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = create_router(test_support::state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_company_routes_need_an_actor() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = create_router(test_support::state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/companies/1/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = test_support::body_json(response).await;
        assert_eq!(body["error"], "missing_actor");
    }
}
