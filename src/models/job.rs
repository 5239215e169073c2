use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::payment::PaymentFrequency;

/// Job posting lifecycle. DELETED is a soft-delete side state; deleted rows
/// are excluded from every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Ongoing,
    PendingCompletion,
    Completed,
    Cancelled,
    Deleted,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Ongoing => "ongoing",
            JobStatus::PendingCompletion => "pending_completion",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Deleted => "deleted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => Some(JobStatus::Open),
            "ongoing" => Some(JobStatus::Ongoing),
            "pending_completion" => Some(JobStatus::PendingCompletion),
            "completed" => Some(JobStatus::Completed),
            "cancelled" => Some(JobStatus::Cancelled),
            "deleted" => Some(JobStatus::Deleted),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Every observed transition must appear here. ONGOING -> COMPLETED is
    /// reserved for the payment-driven completion paths.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        if next == Deleted {
            return !self.is_terminal() && self != Deleted;
        }
        matches!(
            (self, next),
            (Open, Ongoing)
                | (Open, Cancelled)
                | (Ongoing, PendingCompletion)
                | (Ongoing, Completed)
                | (PendingCompletion, Completed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminates one-off gigs from long-term engagements with a payment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Onetime,
    Longterm,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Onetime => "onetime",
            JobKind::Longterm => "longterm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceStatus {
    Active,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPost {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub job_type: JobKind,
    pub status: JobStatus,
    pub budget: Decimal,
    pub people_needed: i32,
    pub is_longterm: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub payment_amount: Option<Decimal>,
    pub payment_anchor_days: Option<Json<Vec<u32>>>,
    pub is_recurring: bool,
    pub recurrence_day_of_week: Option<String>,
    pub recurrence_start_time: Option<String>,
    pub recurrence_end_time: Option<String>,
    pub recurrence_frequency: Option<PaymentFrequency>,
    pub recurring_status: Option<RecurrenceStatus>,
    pub recurring_cancelled_by: Option<Uuid>,
    pub recurring_cancel_reason: Option<String>,
    pub recurring_cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl JobPost {
    /// Bulk schedules are generated only when the flag and the discriminator
    /// agree; legacy rows sometimes carry one without the other.
    pub fn is_genuinely_longterm(&self) -> bool {
        self.is_longterm && self.job_type == JobKind::Longterm
    }

    pub fn recurring_active(&self) -> bool {
        self.is_recurring && matches!(self.recurring_status, Some(RecurrenceStatus::Active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_jobs_can_start_or_cancel() {
        assert!(JobStatus::Open.can_transition_to(JobStatus::Ongoing));
        assert!(JobStatus::Open.can_transition_to(JobStatus::Cancelled));
        assert!(!JobStatus::Open.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Open.can_transition_to(JobStatus::PendingCompletion));
    }

    #[test]
    fn completion_flows_through_pending_completion_or_payment() {
        assert!(JobStatus::Ongoing.can_transition_to(JobStatus::PendingCompletion));
        assert!(JobStatus::Ongoing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::PendingCompletion.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Ongoing.can_transition_to(JobStatus::Cancelled));
        assert!(!JobStatus::PendingCompletion.can_transition_to(JobStatus::Cancelled));
    }

    #[test]
    fn terminal_statuses_accept_nothing() {
        for next in [
            JobStatus::Open,
            JobStatus::Ongoing,
            JobStatus::PendingCompletion,
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::Deleted,
        ] {
            assert!(!JobStatus::Completed.can_transition_to(next));
            assert!(!JobStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn soft_delete_reaches_only_non_terminal_statuses() {
        assert!(JobStatus::Open.can_transition_to(JobStatus::Deleted));
        assert!(JobStatus::Ongoing.can_transition_to(JobStatus::Deleted));
        assert!(JobStatus::PendingCompletion.can_transition_to(JobStatus::Deleted));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Deleted));
        assert!(!JobStatus::Cancelled.can_transition_to(JobStatus::Deleted));
        assert!(!JobStatus::Deleted.can_transition_to(JobStatus::Deleted));
    }

    #[test]
    fn wire_strings_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::PendingCompletion).unwrap(),
            "\"pending_completion\""
        );
        assert_eq!(serde_json::to_string(&JobKind::Onetime).unwrap(), "\"onetime\"");
        assert_eq!(
            serde_json::to_string(&RecurrenceStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(JobStatus::parse("pending_completion"), Some(JobStatus::PendingCompletion));
        assert_eq!(JobStatus::parse("bogus"), None);
    }
}
