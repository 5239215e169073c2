use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ledger states for a single scheduled payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Sent,
    Confirmed,
    Disputed,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Sent => "sent",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Disputed => "disputed",
            PaymentStatus::Overdue => "overdue",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Confirmed | PaymentStatus::Disputed)
    }

    /// Legal ledger moves. Status advances monotonically; OVERDUE is not
    /// terminal, paying late clears it.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Pending, Sent)
                | (Pending, Overdue)
                | (Pending, Disputed)
                | (Sent, Confirmed)
                | (Sent, Disputed)
                | (Overdue, Sent)
                | (Overdue, Confirmed)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment cadence. Anything the generator does not recognize collapses to
/// `Custom`, which produces a single payment at the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

impl PaymentFrequency {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => PaymentFrequency::Weekly,
            "biweekly" => PaymentFrequency::Biweekly,
            "monthly" => PaymentFrequency::Monthly,
            _ => PaymentFrequency::Custom,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentSchedule {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub worker_id: Uuid,
    pub worker_name: Option<String>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub amount_paid: Option<Decimal>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by_worker: bool,
    pub dispute_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_moves_forward_only() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(Sent));
        assert!(Pending.can_transition_to(Overdue));
        assert!(Sent.can_transition_to(Confirmed));
        assert!(Overdue.can_transition_to(Sent));
        assert!(Overdue.can_transition_to(Confirmed));

        assert!(!Confirmed.can_transition_to(Sent));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Disputed.can_transition_to(Sent));
        assert!(!Sent.can_transition_to(Pending));
        assert!(!Overdue.can_transition_to(Disputed));
    }

    #[test]
    fn statuses_use_lowercase_wire_strings() {
        for (status, wire) in [
            (PaymentStatus::Pending, "\"pending\""),
            (PaymentStatus::Sent, "\"sent\""),
            (PaymentStatus::Confirmed, "\"confirmed\""),
            (PaymentStatus::Disputed, "\"disputed\""),
            (PaymentStatus::Overdue, "\"overdue\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            let parsed: PaymentStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_frequency_collapses_to_custom() {
        assert_eq!(PaymentFrequency::parse("weekly"), PaymentFrequency::Weekly);
        assert_eq!(PaymentFrequency::parse("BIWEEKLY"), PaymentFrequency::Biweekly);
        assert_eq!(PaymentFrequency::parse(" monthly "), PaymentFrequency::Monthly);
        assert_eq!(PaymentFrequency::parse("daily"), PaymentFrequency::Custom);
        assert_eq!(PaymentFrequency::parse(""), PaymentFrequency::Custom);
    }
}
