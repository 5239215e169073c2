use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Events this engine emits. Delivery (push, in-app feed) is another
/// service's concern; we only write the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JobApplication,
    ApplicationAccepted,
    ApplicationRejected,
    CompletionSubmitted,
    CompletionApproved,
    PaymentSent,
    PaymentReceived,
    DirectHireRequest,
    DirectHireAccepted,
    DirectHireRejected,
    DirectHireStarted,
    DirectHireCompleted,
    DirectHireApproved,
    DirectHirePaid,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
