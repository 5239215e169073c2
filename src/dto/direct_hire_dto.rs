use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::direct_hire::DirectHireStatus;
use crate::models::payment::PaymentFrequency;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDirectHirePayload {
    pub worker_id: Uuid,
    #[validate(length(min = 1))]
    pub package_ids: Vec<Uuid>,
    pub total_amount: Decimal,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_day_of_week: Option<String>,
    pub recurrence_start_time: Option<String>,
    pub recurrence_end_time: Option<String>,
    pub recurrence_frequency: Option<PaymentFrequency>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SubmitHireCompletionPayload {
    pub proof_url: Option<String>,
    pub notes: Option<String>,
}

/// Employer's payment for an approved booking. Non-cash methods carry a
/// reference number.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HirePaymentPayload {
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub payment_proof_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DirectHireListQuery {
    pub status: Option<DirectHireStatus>,
}
