use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Pending,
    Active,
    PendingCompletion,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "pending",
            ContractStatus::Active => "active",
            ContractStatus::PendingCompletion => "pending_completion",
            ContractStatus::Completed => "completed",
            ContractStatus::Cancelled => "cancelled",
        }
    }

    /// ACTIVE -> COMPLETED without the pending step exists for the long-term
    /// payment path, which closes contracts when the last schedule confirms.
    pub fn can_transition_to(self, next: ContractStatus) -> bool {
        use ContractStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Cancelled)
                | (Active, PendingCompletion)
                | (Active, Completed)
                | (Active, Cancelled)
                | (PendingCompletion, Completed)
        )
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-worker engagement under a job post; one per (post, worker).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub post_id: Uuid,
    pub worker_id: Uuid,
    pub worker_name: Option<String>,
    pub employer_id: Uuid,
    pub status: ContractStatus,
    pub worker_accepted: bool,
    pub employer_accepted: bool,
    pub completion_proof_url: Option<String>,
    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_proof_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_lifecycle_table() {
        use ContractStatus::*;
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(PendingCompletion));
        assert!(Active.can_transition_to(Completed));
        assert!(PendingCompletion.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(PendingCompletion));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Active));
        assert!(!PendingCompletion.can_transition_to(Cancelled));
    }

    #[test]
    fn pending_completion_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&ContractStatus::PendingCompletion).unwrap();
        assert_eq!(json, "\"pending_completion\"");

        let parsed: ContractStatus = serde_json::from_str("\"pending_completion\"").unwrap();
        assert_eq!(parsed, ContractStatus::PendingCompletion);
    }
}
