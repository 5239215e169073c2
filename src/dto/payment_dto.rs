use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::payment::{PaymentSchedule, PaymentTransaction};

/// Schedule row with the transaction recorded against it, the shape every
/// listing endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub schedule: PaymentSchedule,
    pub transaction: Option<PaymentTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutgoingQuery {
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkSentPayload {
    pub amount_paid: Option<Decimal>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DisputePayload {
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}

/// One-off payment an employer records against a short-term contract.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentPayload {
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
}
