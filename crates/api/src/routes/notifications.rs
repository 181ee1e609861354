//! In-app notification routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use ledgerflow_db::repositories::NotificationRepository;
use serde::Serialize;

use crate::{AppState, error::ApiError, middleware::ActorUser};

/// Creates the notification routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/notifications",
        get(list_notifications),
    )
}

/// A notification addressed to the acting user.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Notification id.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Deep link into the UI.
    pub link: Option<String>,
    /// Whether the user has read it.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

/// GET /companies/{company_id}/notifications
async fn list_notifications(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    actor: ActorUser,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = NotificationRepository::new((*state.db).clone())
        .list_for_user(company_id, actor.user_id())
        .await?;

    let response: Vec<NotificationResponse> = notifications
        .into_iter()
        .map(|n| NotificationResponse {
            id: n.id,
            title: n.title,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at,
        })
        .collect();

    Ok(Json(response))
}
