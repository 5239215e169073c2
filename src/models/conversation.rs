use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Two-party thread keyed by the job or direct hire that spawned it, with
/// the participants stored as a sorted pair. Messaging itself lives
/// elsewhere; this crate only guarantees the thread exists exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    pub hire_id: Option<Uuid>,
    pub participant_one: Uuid,
    pub participant_two: Uuid,
    pub created_at: DateTime<Utc>,
}
