//! In-app notifications for approval assignees.

use chrono::Utc;
use ledgerflow_core::workflow::WorkflowError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionSession, TransactionTrait,
};
use tracing::warn;

use super::workflow_db_err;
use crate::entities::notifications;

/// A notification to be stored for a user.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Company scope.
    pub company_id: i64,
    /// Recipient.
    pub user_id: i64,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional deep link.
    pub link: Option<String>,
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        company_id: i64,
        user_id: i64,
    ) -> Result<Vec<notifications::Model>, WorkflowError> {
        notifications::Entity::find()
            .filter(notifications::Column::CompanyId.eq(company_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::Id)
            .all(&self.db)
            .await
            .map_err(workflow_db_err)
    }

    /// Stores a notification in a savepoint of the caller's transaction.
    ///
    /// Best effort: a failed insert rolls back only the savepoint, is
    /// logged, and reported as `None`.
    pub async fn notify_in<C>(conn: &C, notification: NewNotification) -> Option<i64>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let savepoint = match conn.begin().await {
            Ok(sp) => sp,
            Err(e) => {
                warn!(error = %e, user_id = notification.user_id, "Notification skipped");
                return None;
            }
        };

        let inserted = notifications::ActiveModel {
            company_id: Set(notification.company_id),
            user_id: Set(notification.user_id),
            title: Set(notification.title),
            message: Set(notification.message),
            link: Set(notification.link),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&savepoint)
        .await;

        let outcome = match inserted {
            Ok(model) => savepoint.commit().await.map(|()| model.id),
            Err(e) => savepoint.rollback().await.and(Err(e)),
        };

        match outcome {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, user_id = notification.user_id, "Notification dropped");
                None
            }
        }
    }
}
