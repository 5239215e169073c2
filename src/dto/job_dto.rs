use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::contract::{Contract, ContractStatus};
use crate::models::job::{JobKind, JobPost, JobStatus};
use crate::models::payment::PaymentFrequency;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub job_type: JobKind,
    pub budget: Decimal,
    #[validate(range(min = 1, max = 100))]
    pub people_needed: i32,
    #[serde(default)]
    pub is_longterm: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub payment_amount: Option<Decimal>,
    pub payment_anchor_days: Option<Vec<u32>>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_day_of_week: Option<String>,
    pub recurrence_start_time: Option<String>,
    pub recurrence_end_time: Option<String>,
    pub recurrence_frequency: Option<PaymentFrequency>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub budget: Option<Decimal>,
    #[validate(range(min = 1, max = 100))]
    pub people_needed: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub payment_amount: Option<Decimal>,
    pub payment_anchor_days: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusPayload {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobKind>,
    pub longterm: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListResponse {
    pub items: Vec<JobPost>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Unauthenticated browse takes only a result cap.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BrowseJobsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartJobPayload {
    #[validate(length(min = 1))]
    pub application_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCompletionPayload {
    pub proof_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApproveCompletionPayload {
    /// Approve one contract, or every pending one when omitted.
    pub contract_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CancelRecurringPayload {
    pub reason: Option<String>,
}

/// Application row joined with its contract, as shown to the employer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicantEntry {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub worker_name: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub contract_id: Uuid,
    pub contract_status: ContractStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractCompletionEntry {
    pub contract_id: Uuid,
    pub worker_id: Uuid,
    pub worker_name: Option<String>,
    pub status: ContractStatus,
    pub completion_proof_url: Option<String>,
    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionDetailsResponse {
    pub job_id: Uuid,
    pub job_status: JobStatus,
    pub people_needed: i32,
    pub contracts: Vec<ContractCompletionEntry>,
}

/// A worker's own application on a job, with the contract that tracks it.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusResponse {
    pub application: Application,
    pub contract: Option<Contract>,
}
