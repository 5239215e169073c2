use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_dto::{
    ApplicantEntry, ApplicationStatusResponse, ApproveCompletionPayload, CancelRecurringPayload,
    CompletionDetailsResponse, ContractCompletionEntry, CreateJobPayload, JobListQuery,
    StartJobPayload, SubmitCompletionPayload, UpdateJobPayload, UpdateJobStatusPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::contract::{Contract, ContractStatus};
use crate::models::job::{JobPost, JobStatus, RecurrenceStatus};
use crate::models::notification::NotificationKind;
use crate::models::payment::PaymentFrequency;
use crate::services::contract_service::ContractService;
use crate::services::conversation_service::ConversationService;
use crate::services::notification_service::NotificationService;
use crate::services::payment_service::PaymentService;
use crate::services::schedule_service::{ScheduleService, DEFAULT_ANCHOR_DAYS};
use crate::utils::time;

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

pub struct JobList {
    pub items: Vec<JobPost>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Inputs the schedule generator needs, resolved from a job post with the
/// fallbacks applied: today when no start date, one year out when no end
/// date, monthly cadence, and the job budget when no per-payment amount.
pub struct ScheduleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: PaymentFrequency,
    pub amount: Decimal,
    pub anchor_days: Vec<u32>,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, employer: &CurrentUser, payload: CreateJobPayload) -> Result<JobPost> {
        if payload.budget <= Decimal::ZERO {
            return Err(Error::BadRequest("budget must be positive".to_string()));
        }
        if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
            if end < start {
                return Err(Error::BadRequest(
                    "end date cannot precede start date".to_string(),
                ));
            }
        }
        Self::validate_anchor_days(payload.payment_anchor_days.as_deref())?;

        let recurring_status = if payload.is_recurring {
            Some(RecurrenceStatus::Active)
        } else {
            None
        };

        let job = sqlx::query_as::<_, JobPost>(
            r#"
            INSERT INTO job_posts (
                id, employer_id, title, description, job_type, status,
                budget, people_needed, is_longterm, start_date, end_date,
                payment_frequency, payment_amount, payment_anchor_days,
                is_recurring, recurrence_day_of_week, recurrence_start_time,
                recurrence_end_time, recurrence_frequency, recurring_status
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, $14,
                $15, $16, $17,
                $18, $19, $20
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(employer.id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.job_type)
        .bind(JobStatus::Open)
        .bind(payload.budget)
        .bind(payload.people_needed)
        .bind(payload.is_longterm)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.payment_frequency)
        .bind(payload.payment_amount)
        .bind(payload.payment_anchor_days.clone().map(sqlx::types::Json))
        .bind(payload.is_recurring)
        .bind(&payload.recurrence_day_of_week)
        .bind(&payload.recurrence_start_time)
        .bind(&payload.recurrence_end_time)
        .bind(payload.recurrence_frequency)
        .bind(recurring_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> Result<JobPost> {
        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut filters = vec!["deleted_at IS NULL".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(job_type) = query.job_type {
            filters.push(format!("job_type = ${}", args.len() + 1));
            args.push(job_type.as_str().to_string());
        }
        if let Some(longterm) = query.longterm {
            filters.push(format!(
                "is_longterm = {}",
                if longterm { "TRUE" } else { "FALSE" }
            ));
        }
        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(title ILIKE ${} OR description ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }

        let where_clause = format!("WHERE {}", filters.join(" AND "));

        let items_query = format!(
            "SELECT * FROM job_posts {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM job_posts {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, JobPost>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(per_page).bind(offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(JobList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Open jobs for the public browse surface.
    pub async fn list_open(&self, limit: i64) -> Result<Vec<JobPost>> {
        let limit = if limit <= 0 { 20 } else { limit.min(100) };
        let items = sqlx::query_as::<_, JobPost>(
            r#"
            SELECT * FROM job_posts
            WHERE status = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(JobStatus::Open)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_for_employer(&self, employer_id: Uuid) -> Result<Vec<JobPost>> {
        let items = sqlx::query_as::<_, JobPost>(
            r#"
            SELECT * FROM job_posts
            WHERE employer_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_applications_for_worker(&self, worker_id: Uuid) -> Result<Vec<Application>> {
        let items = sqlx::query_as::<_, Application>(
            "SELECT * FROM job_applications WHERE worker_id = $1 ORDER BY created_at DESC",
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// A worker's own standing on one job: the application they filed plus
    /// the contract that tracks it.
    pub async fn application_status(
        &self,
        job_id: Uuid,
        worker: &CurrentUser,
    ) -> Result<ApplicationStatusResponse> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM job_applications WHERE post_id = $1 AND worker_id = $2",
        )
        .bind(job_id)
        .bind(worker.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("no application for this job".to_string()))?;

        let mut conn = self.pool.acquire().await?;
        let contract = ContractService::load_for_worker(&mut conn, job_id, worker.id).await?;

        Ok(ApplicationStatusResponse {
            application,
            contract,
        })
    }

    /// Title and description stay editable while the job is live. The
    /// structural terms (budget, headcount, dates, payment plan) lock the
    /// moment workers are engaged, since contracts were priced against them.
    pub async fn update(
        &self,
        id: Uuid,
        employer: &CurrentUser,
        payload: UpdateJobPayload,
    ) -> Result<JobPost> {
        let job = self.get(id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if job.status.is_terminal() {
            return Err(Error::IllegalTransition(format!(
                "job in status {} can no longer be edited",
                job.status
            )));
        }
        if Self::changes_structural_terms(&payload) && job.status != JobStatus::Open {
            return Err(Error::IllegalTransition(format!(
                "job in status {} only accepts title and description edits",
                job.status
            )));
        }
        Self::validate_anchor_days(payload.payment_anchor_days.as_deref())?;

        let job = sqlx::query_as::<_, JobPost>(
            r#"
            UPDATE job_posts
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                budget = COALESCE($4, budget),
                people_needed = COALESCE($5, people_needed),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                payment_frequency = COALESCE($8, payment_frequency),
                payment_amount = COALESCE($9, payment_amount),
                payment_anchor_days = COALESCE($10, payment_anchor_days),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.budget)
        .bind(payload.people_needed)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.payment_frequency)
        .bind(payload.payment_amount)
        .bind(payload.payment_anchor_days.clone().map(sqlx::types::Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn cancel(&self, id: Uuid, employer: &CurrentUser) -> Result<JobPost> {
        let job = self.get(id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if !job.status.can_transition_to(JobStatus::Cancelled) {
            return Err(Error::IllegalTransition(format!(
                "job in status {} cannot be cancelled",
                job.status
            )));
        }

        let job = sqlx::query_as::<_, JobPost>(
            "UPDATE job_posts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(JobStatus::Cancelled)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    /// Manual status changes. Cancelling follows the normal transition
    /// table; COMPLETED is accepted only as a ratification of a completion
    /// the contracts already show. Every other target is driven by the
    /// lifecycle itself and cannot be set by hand.
    pub async fn update_status(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
        payload: UpdateJobStatusPayload,
    ) -> Result<JobPost> {
        match payload.status {
            JobStatus::Cancelled => self.cancel(job_id, employer).await,
            JobStatus::Completed => self.ratify_completion(job_id, employer).await,
            other => Err(Error::IllegalTransition(format!(
                "status {} cannot be set manually",
                other
            ))),
        }
    }

    /// Confirms a completion without approving anything on the way: the job
    /// must already sit in PENDING_COMPLETION with every engaged contract
    /// individually approved.
    async fn ratify_completion(&self, job_id: Uuid, employer: &CurrentUser) -> Result<JobPost> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if job.status != JobStatus::PendingCompletion {
            return Err(Error::IllegalTransition(format!(
                "job in status {} cannot be marked completed",
                job.status
            )));
        }

        let engaged = ContractService::load_engaged_for_job(&mut tx, job_id).await?;
        if !ContractService::all_completed(&engaged) {
            return Err(Error::IllegalTransition(
                "contracts are still awaiting completion approval".to_string(),
            ));
        }

        let job = sqlx::query_as::<_, JobPost>(
            r#"
            UPDATE job_posts
            SET status = $2, completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Completed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(job)
    }

    /// Soft delete. The row is kept for contract and payment history.
    pub async fn soft_delete(&self, id: Uuid, employer: &CurrentUser) -> Result<()> {
        let job = self.get(id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if !job.status.can_transition_to(JobStatus::Deleted) {
            return Err(Error::IllegalTransition(format!(
                "job in status {} cannot be deleted",
                job.status
            )));
        }

        sqlx::query(
            "UPDATE job_posts SET status = $2, deleted_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Worker applies to an open job. The application and its PENDING
    /// contract are written in one transaction so neither can exist alone.
    pub async fn apply(
        &self,
        job_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        if job.status != JobStatus::Open {
            return Err(Error::IllegalTransition(format!(
                "job in status {} does not take applications",
                job.status
            )));
        }
        if job.employer_id == worker.id {
            return Err(Error::BadRequest(
                "cannot apply to your own job".to_string(),
            ));
        }

        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO job_applications (id, post_id, worker_id, worker_name, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(worker.id)
        .bind(worker.name.as_deref())
        .bind(ApplicationStatus::Pending)
        .fetch_one(&mut *tx)
        .await;

        let application = match inserted {
            Ok(application) => application,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(Error::BadRequest(
                    "you already applied to this job".to_string(),
                ));
            }
            Err(other) => return Err(other.into()),
        };

        ContractService::create_on_apply(
            &mut tx,
            job_id,
            worker.id,
            worker.name.as_deref(),
            job.employer_id,
        )
        .await?;

        tx.commit().await?;

        notif
            .notify(
                job.employer_id,
                NotificationKind::JobApplication,
                "New application",
                &format!("A worker applied to \"{}\"", job.title),
                "job",
                job.id,
            )
            .await;

        Ok(application)
    }

    pub async fn list_applicants(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
    ) -> Result<Vec<ApplicantEntry>> {
        let job = self.get(job_id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }

        let entries = sqlx::query_as::<_, ApplicantEntry>(
            r#"
            SELECT
                a.id, a.worker_id, a.worker_name, a.status,
                a.created_at AS applied_at,
                c.id AS contract_id, c.status AS contract_status
            FROM job_applications a
            JOIN contracts c ON c.post_id = a.post_id AND c.worker_id = a.worker_id
            WHERE a.post_id = $1
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn reject_application(
        &self,
        job_id: Uuid,
        application_id: Uuid,
        employer: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }

        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM job_applications WHERE id = $1 AND post_id = $2",
        )
        .bind(application_id)
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;
        if application.status != ApplicationStatus::Pending {
            return Err(Error::BadRequest(
                "application has already been decided".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, Application>(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(application_id)
        .bind(ApplicationStatus::Rejected)
        .fetch_one(&mut *tx)
        .await?;

        // The companion contract leaves the pool of engaged workers.
        if let Some(contract) =
            ContractService::load_for_worker(&mut tx, job_id, application.worker_id).await?
        {
            if contract.status == ContractStatus::Pending {
                sqlx::query(
                    "UPDATE contracts SET status = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(contract.id)
                .bind(ContractStatus::Cancelled)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        notif
            .notify(
                application.worker_id,
                NotificationKind::ApplicationRejected,
                "Application update",
                &format!("Your application for \"{}\" was not selected", job.title),
                "job",
                job.id,
            )
            .await;

        Ok(application)
    }

    /// Employer fills the job. The selection must land the accepted head
    /// count exactly on `people_needed`; on success every selected worker's
    /// contract activates, long-term jobs get their payment schedules, and
    /// the job moves to ONGOING in the same transaction.
    pub async fn start_job(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
        payload: StartJobPayload,
        notif: &NotificationService,
    ) -> Result<JobPost> {
        let selected: BTreeSet<Uuid> = payload.application_ids.iter().copied().collect();
        let selected_ids: Vec<Uuid> = selected.iter().copied().collect();

        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if !job.status.can_transition_to(JobStatus::Ongoing) {
            return Err(Error::IllegalTransition(format!(
                "job in status {} cannot be started",
                job.status
            )));
        }

        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM job_applications WHERE post_id = $1 AND id = ANY($2)",
        )
        .bind(job_id)
        .bind(&selected_ids)
        .fetch_all(&mut *tx)
        .await?;

        if applications.len() != selected_ids.len() {
            return Err(Error::NotFound(
                "one or more applications do not belong to this job".to_string(),
            ));
        }
        if let Some(decided) = applications
            .iter()
            .find(|a| a.status != ApplicationStatus::Pending)
        {
            return Err(Error::BadRequest(format!(
                "application {} has already been decided",
                decided.id
            )));
        }

        let already_accepted = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM job_applications WHERE post_id = $1 AND status = $2",
        )
        .bind(job_id)
        .bind(ApplicationStatus::Accepted)
        .fetch_one(&mut *tx)
        .await?;

        Self::validate_selection(job.people_needed, already_accepted, applications.len())?;

        let window = Self::schedule_window(&job);
        let due_dates = ScheduleService::generate_due_dates(
            window.start,
            window.end,
            window.frequency,
            &window.anchor_days,
        );
        let mut accepted_workers: Vec<Uuid> = Vec::new();

        for application in &applications {
            sqlx::query(
                "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(application.id)
            .bind(ApplicationStatus::Accepted)
            .execute(&mut *tx)
            .await?;

            let contract = ContractService::load_for_worker(&mut tx, job_id, application.worker_id)
                .await?
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "no contract found for worker {}",
                        application.worker_id
                    ))
                })?;
            if !contract.status.can_transition_to(ContractStatus::Active) {
                return Err(Error::IllegalTransition(format!(
                    "contract {} in status {} cannot be activated",
                    contract.id, contract.status
                )));
            }
            let contract = ContractService::activate(&mut tx, contract.id).await?;

            if job.is_genuinely_longterm() {
                PaymentService::insert_pending_rows(&mut tx, &contract, &due_dates, window.amount)
                    .await?;
            }

            ConversationService::ensure_for_job(
                &mut tx,
                job_id,
                job.employer_id,
                application.worker_id,
            )
            .await?;

            accepted_workers.push(application.worker_id);
        }

        let job = sqlx::query_as::<_, JobPost>(
            "UPDATE job_posts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(job_id)
        .bind(JobStatus::Ongoing)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        for worker_id in accepted_workers {
            notif
                .notify(
                    worker_id,
                    NotificationKind::ApplicationAccepted,
                    "Application accepted",
                    &format!("You were selected for \"{}\"", job.title),
                    "job",
                    job.id,
                )
                .await;
        }

        Ok(job)
    }

    /// Worker reports a short-term job finished. Long-term jobs refuse this
    /// path; their completion is driven by confirmed payments.
    pub async fn submit_completion(
        &self,
        job_id: Uuid,
        worker: &CurrentUser,
        payload: SubmitCompletionPayload,
        notif: &NotificationService,
    ) -> Result<Contract> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        if job.is_genuinely_longterm() {
            return Err(Error::BadRequest(
                "long-term jobs complete through confirmed payments".to_string(),
            ));
        }
        if !matches!(
            job.status,
            JobStatus::Ongoing | JobStatus::PendingCompletion
        ) {
            return Err(Error::IllegalTransition(format!(
                "job in status {} does not accept completion submissions",
                job.status
            )));
        }

        let contract = ContractService::load_for_worker(&mut tx, job_id, worker.id)
            .await?
            .ok_or_else(|| Error::NotFound("no contract for this worker".to_string()))?;
        if !contract
            .status
            .can_transition_to(ContractStatus::PendingCompletion)
        {
            return Err(Error::IllegalTransition(format!(
                "contract in status {} cannot submit completion",
                contract.status
            )));
        }

        let contract = ContractService::submit_completion(
            &mut tx,
            contract.id,
            payload.proof_url.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

        if job.status == JobStatus::Ongoing {
            sqlx::query(
                "UPDATE job_posts SET status = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(job_id)
            .bind(JobStatus::PendingCompletion)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        notif
            .notify(
                job.employer_id,
                NotificationKind::CompletionSubmitted,
                "Completion submitted",
                &format!("A worker reported \"{}\" as finished", job.title),
                "job",
                job.id,
            )
            .await;

        Ok(contract)
    }

    /// Employer approves completion for one contract, or for every contract
    /// currently awaiting approval when none is named. The job itself
    /// completes only once every engaged contract is approved.
    pub async fn approve_completion(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
        payload: ApproveCompletionPayload,
        notif: &NotificationService,
    ) -> Result<JobPost> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }
        if job.status != JobStatus::PendingCompletion {
            return Err(Error::IllegalTransition(format!(
                "job in status {} has no completion to approve",
                job.status
            )));
        }

        let engaged = ContractService::load_engaged_for_job(&mut tx, job_id).await?;

        let targets: Vec<&Contract> = match payload.contract_id {
            Some(contract_id) => {
                let contract = engaged
                    .iter()
                    .find(|c| c.id == contract_id)
                    .ok_or_else(|| Error::NotFound("contract not found for this job".to_string()))?;
                if contract.status != ContractStatus::PendingCompletion {
                    return Err(Error::IllegalTransition(format!(
                        "contract in status {} is not awaiting approval",
                        contract.status
                    )));
                }
                vec![contract]
            }
            None => {
                let pending: Vec<&Contract> = engaged
                    .iter()
                    .filter(|c| c.status == ContractStatus::PendingCompletion)
                    .collect();
                if pending.is_empty() {
                    return Err(Error::BadRequest(
                        "no completions awaiting approval".to_string(),
                    ));
                }
                pending
            }
        };

        let mut approved_workers: Vec<Uuid> = Vec::new();
        for contract in targets {
            ContractService::mark_completed(&mut tx, contract.id).await?;
            approved_workers.push(contract.worker_id);
        }

        let engaged = ContractService::load_engaged_for_job(&mut tx, job_id).await?;
        let job = if ContractService::all_completed(&engaged) {
            sqlx::query_as::<_, JobPost>(
                r#"
                UPDATE job_posts
                SET status = $2, completed_at = NOW(), updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(job_id)
            .bind(JobStatus::Completed)
            .fetch_one(&mut *tx)
            .await?
        } else {
            job
        };

        tx.commit().await?;

        for worker_id in approved_workers {
            notif
                .notify(
                    worker_id,
                    NotificationKind::CompletionApproved,
                    "Completion approved",
                    &format!("Your work on \"{}\" was approved", job.title),
                    "job",
                    job.id,
                )
                .await;
        }

        Ok(job)
    }

    pub async fn completion_details(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
    ) -> Result<CompletionDetailsResponse> {
        let job = self.get(job_id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }

        let contracts = self.contracts_for_job(job_id).await?;
        let contracts = contracts
            .into_iter()
            .map(|c| ContractCompletionEntry {
                contract_id: c.id,
                worker_id: c.worker_id,
                worker_name: c.worker_name,
                status: c.status,
                completion_proof_url: c.completion_proof_url,
                completion_notes: c.completion_notes,
                completed_at: c.completed_at,
                paid_at: c.paid_at,
            })
            .collect();

        Ok(CompletionDetailsResponse {
            job_id: job.id,
            job_status: job.status,
            people_needed: job.people_needed,
            contracts,
        })
    }

    /// Stops a recurring service. Either side can pull out: the employer,
    /// or any worker holding a live contract on the job. The job keeps its
    /// current status; payment confirmations simply stop extending the
    /// schedule.
    pub async fn cancel_recurring(
        &self,
        job_id: Uuid,
        caller: &CurrentUser,
        payload: CancelRecurringPayload,
        notif: &NotificationService,
    ) -> Result<JobPost> {
        let job = self.get(job_id).await?;
        let is_owner = job.employer_id == caller.id;
        if !is_owner {
            let mut conn = self.pool.acquire().await?;
            let live = ContractService::load_for_worker(&mut conn, job_id, caller.id)
                .await?
                .is_some_and(|c| c.status != ContractStatus::Cancelled);
            if !live {
                return Err(Error::Forbidden(
                    "only the employer or a contracted worker can cancel the service".to_string(),
                ));
            }
        }
        if !job.is_recurring {
            return Err(Error::BadRequest("job is not recurring".to_string()));
        }
        if !job.recurring_active() {
            return Err(Error::BadRequest(
                "recurring service is already cancelled".to_string(),
            ));
        }

        let job = sqlx::query_as::<_, JobPost>(
            r#"
            UPDATE job_posts
            SET recurring_status = $2, recurring_cancelled_by = $3,
                recurring_cancel_reason = $4, recurring_cancelled_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(RecurrenceStatus::Cancelled)
        .bind(caller.id)
        .bind(&payload.reason)
        .fetch_one(&self.pool)
        .await?;

        if is_owner {
            let engaged = {
                let mut conn = self.pool.acquire().await?;
                ContractService::load_engaged_for_job(&mut conn, job_id).await?
            };
            for contract in engaged {
                notif
                    .notify(
                        contract.worker_id,
                        NotificationKind::System,
                        "Recurring service cancelled",
                        &format!("The recurring service \"{}\" was cancelled", job.title),
                        "job",
                        job.id,
                    )
                    .await;
            }
        } else {
            notif
                .notify(
                    job.employer_id,
                    NotificationKind::System,
                    "Recurring service cancelled",
                    &format!("A worker cancelled the recurring service \"{}\"", job.title),
                    "job",
                    job.id,
                )
                .await;
        }

        Ok(job)
    }

    async fn contracts_for_job(&self, job_id: Uuid) -> Result<Vec<Contract>> {
        let mut conn = self.pool.acquire().await?;
        ContractService::load_for_job(&mut conn, job_id).await
    }

    /// Anchor days are calendar days of month. Days the month does not hold
    /// are resolved at generation time, so 29..=31 are legal here.
    fn validate_anchor_days(days: Option<&[u32]>) -> Result<()> {
        if let Some(days) = days {
            if days.iter().any(|day| !(1..=31).contains(day)) {
                return Err(Error::BadRequest(
                    "payment anchor days must fall within 1..=31".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Fields that contracts were priced against. Edits to these are only
    /// allowed while no worker is engaged yet.
    fn changes_structural_terms(payload: &UpdateJobPayload) -> bool {
        payload.budget.is_some()
            || payload.people_needed.is_some()
            || payload.start_date.is_some()
            || payload.end_date.is_some()
            || payload.payment_frequency.is_some()
            || payload.payment_amount.is_some()
            || payload.payment_anchor_days.is_some()
    }

    /// Hard headcount rule: the accepted workers plus this selection must
    /// land exactly on the required headcount.
    pub fn validate_selection(
        people_needed: i32,
        already_accepted: i64,
        selected: usize,
    ) -> Result<()> {
        let total = already_accepted + selected as i64;
        if total != people_needed as i64 {
            return Err(Error::BadRequest(format!(
                "selection must fill the job exactly: needs {}, already accepted {}, selected {}",
                people_needed, already_accepted, selected
            )));
        }
        Ok(())
    }

    pub fn schedule_window(job: &JobPost) -> ScheduleWindow {
        let start = job.start_date.unwrap_or_else(time::today);
        let end = job.end_date.unwrap_or(start + Duration::days(365));
        let frequency = job.payment_frequency.unwrap_or(PaymentFrequency::Monthly);
        let amount = job.payment_amount.unwrap_or(job.budget);
        let anchor_days = job
            .payment_anchor_days
            .as_ref()
            .map(|days| days.0.clone())
            .filter(|days| !days.is_empty())
            .unwrap_or_else(|| DEFAULT_ANCHOR_DAYS.to_vec());

        ScheduleWindow {
            start,
            end,
            frequency,
            amount,
            anchor_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobKind;
    use chrono::Utc;

    fn job_fixture() -> JobPost {
        JobPost {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            title: "Warehouse crew".to_string(),
            description: "Night shift".to_string(),
            job_type: JobKind::Longterm,
            status: JobStatus::Open,
            budget: Decimal::new(50_000, 2),
            people_needed: 3,
            is_longterm: true,
            start_date: None,
            end_date: None,
            payment_frequency: None,
            payment_amount: None,
            payment_anchor_days: None,
            is_recurring: false,
            recurrence_day_of_week: None,
            recurrence_start_time: None,
            recurrence_end_time: None,
            recurrence_frequency: None,
            recurring_status: None,
            recurring_cancelled_by: None,
            recurring_cancel_reason: None,
            recurring_cancelled_at: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn selection_must_fill_the_headcount_exactly() {
        assert!(JobService::validate_selection(3, 0, 3).is_ok());
        assert!(JobService::validate_selection(3, 1, 2).is_ok());

        assert!(JobService::validate_selection(3, 0, 2).is_err());
        assert!(JobService::validate_selection(3, 0, 4).is_err());
        assert!(JobService::validate_selection(3, 2, 2).is_err());
    }

    #[test]
    fn anchor_days_must_be_calendar_days() {
        assert!(JobService::validate_anchor_days(None).is_ok());
        assert!(JobService::validate_anchor_days(Some(&[1, 15, 31])).is_ok());

        assert!(JobService::validate_anchor_days(Some(&[0])).is_err());
        assert!(JobService::validate_anchor_days(Some(&[15, 32])).is_err());
    }

    #[test]
    fn title_and_description_edits_are_not_structural() {
        let opaque = UpdateJobPayload {
            title: Some("Evening crew".to_string()),
            description: Some("Now with forklift work".to_string()),
            ..Default::default()
        };
        assert!(!JobService::changes_structural_terms(&opaque));

        let budget = UpdateJobPayload {
            budget: Some(Decimal::new(75_000, 2)),
            ..Default::default()
        };
        assert!(JobService::changes_structural_terms(&budget));

        let window = UpdateJobPayload {
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            ..Default::default()
        };
        assert!(JobService::changes_structural_terms(&window));
    }

    #[test]
    fn schedule_window_falls_back_to_defaults() {
        let job = job_fixture();
        let window = JobService::schedule_window(&job);

        assert_eq!(window.end - window.start, Duration::days(365));
        assert_eq!(window.frequency, PaymentFrequency::Monthly);
        assert_eq!(window.amount, job.budget);
        assert_eq!(window.anchor_days, vec![15, 30]);
    }

    #[test]
    fn schedule_window_prefers_configured_values() {
        let mut job = job_fixture();
        job.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        job.end_date = NaiveDate::from_ymd_opt(2024, 6, 30);
        job.payment_frequency = Some(PaymentFrequency::Weekly);
        job.payment_amount = Some(Decimal::new(12_500, 2));
        job.payment_anchor_days = Some(sqlx::types::Json(vec![1, 16]));

        let window = JobService::schedule_window(&job);

        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(window.frequency, PaymentFrequency::Weekly);
        assert_eq!(window.amount, Decimal::new(12_500, 2));
        assert_eq!(window.anchor_days, vec![1, 16]);
    }

    #[test]
    fn empty_anchor_config_is_treated_as_absent() {
        let mut job = job_fixture();
        job.payment_anchor_days = Some(sqlx::types::Json(Vec::new()));

        let window = JobService::schedule_window(&job);
        assert_eq!(window.anchor_days, vec![15, 30]);
    }
}
