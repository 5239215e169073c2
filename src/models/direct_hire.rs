use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::RecurrenceStatus;
use crate::models::payment::PaymentFrequency;

/// Direct booking lifecycle. The worker drives the left side of the flow
/// (accept/start/submit), the employer the right side (approve/pay/cancel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DirectHireStatus {
    Pending,
    Accepted,
    InProgress,
    PendingCompletion,
    Completed,
    Paid,
    Cancelled,
    Rejected,
}

impl DirectHireStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectHireStatus::Pending => "pending",
            DirectHireStatus::Accepted => "accepted",
            DirectHireStatus::InProgress => "in_progress",
            DirectHireStatus::PendingCompletion => "pending_completion",
            DirectHireStatus::Completed => "completed",
            DirectHireStatus::Paid => "paid",
            DirectHireStatus::Cancelled => "cancelled",
            DirectHireStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(DirectHireStatus::Pending),
            "accepted" => Some(DirectHireStatus::Accepted),
            "in_progress" => Some(DirectHireStatus::InProgress),
            "pending_completion" => Some(DirectHireStatus::PendingCompletion),
            "completed" => Some(DirectHireStatus::Completed),
            "paid" => Some(DirectHireStatus::Paid),
            "cancelled" => Some(DirectHireStatus::Cancelled),
            "rejected" => Some(DirectHireStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DirectHireStatus::Paid | DirectHireStatus::Cancelled | DirectHireStatus::Rejected
        )
    }

    pub fn can_transition_to(self, next: DirectHireStatus) -> bool {
        use DirectHireStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Accepted, InProgress)
                | (Accepted, Cancelled)
                | (InProgress, PendingCompletion)
                | (PendingCompletion, Completed)
                | (Completed, Paid)
        )
    }
}

impl std::fmt::Display for DirectHireStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DirectHire {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub worker_id: Uuid,
    pub package_ids: Json<Vec<Uuid>>,
    pub total_amount: Decimal,
    pub status: DirectHireStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub special_instructions: Option<String>,
    pub is_recurring: bool,
    pub recurrence_day_of_week: Option<String>,
    pub recurrence_start_time: Option<String>,
    pub recurrence_end_time: Option<String>,
    pub recurrence_frequency: Option<PaymentFrequency>,
    pub recurring_status: Option<RecurrenceStatus>,
    pub completion_proof_url: Option<String>,
    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_proof_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DirectHire {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.employer_id == user_id || self.worker_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_flow_table() {
        use DirectHireStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(InProgress));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(PendingCompletion));
        assert!(PendingCompletion.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Paid));
    }

    #[test]
    fn cancellation_window_closes_once_work_starts() {
        use DirectHireStatus::*;
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!PendingCompletion.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(InProgress));
        for next in [Pending, Accepted, InProgress, PendingCompletion, Completed] {
            assert!(!Paid.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn in_progress_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&DirectHireStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(DirectHireStatus::parse("in_progress"), Some(DirectHireStatus::InProgress));
    }
}
