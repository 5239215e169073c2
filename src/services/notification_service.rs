use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::notification::{Notification, NotificationKind};

/// In-app notification feed. Writes are fire-and-forget: a failed insert is
/// logged and swallowed so it can never fail the state transition that
/// triggered it.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
        reference_type: &str,
        reference_id: Uuid,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, reference_type, reference_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(reference_type)
        .bind(reference_id)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::warn!(%user_id, %reference_id, "failed to record notification: {}", err);
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT 100
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Marks one notification read. Scoped to the owner so a caller cannot
    /// touch someone else's feed.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
